//! Screen modules for the deskboard TUI

pub mod dashboard;
pub mod documents;
pub mod employees;
pub mod login;
pub mod new_document;
pub mod new_employee;
pub mod settings;

pub use dashboard::DashboardScreen;
pub use documents::DocumentsScreen;
pub use employees::EmployeesScreen;
pub use login::LoginScreen;
pub use new_document::NewDocumentScreen;
pub use new_employee::NewEmployeeScreen;
pub use settings::SettingsScreen;

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::ui::{centered_rect, Theme};

/// Next value of a facet filter: unset, then each option in turn, then unset again
pub(crate) fn next_facet<T: Clone + PartialEq>(current: &Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().cloned(),
        Some(value) => options
            .iter()
            .position(|o| o == value)
            .and_then(|i| options.get(i + 1))
            .cloned(),
    }
}

/// Popup asking the user to confirm a delete
pub(crate) fn draw_delete_prompt(f: &mut Frame, area: Rect, theme: &Theme, what: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let prompt = Paragraph::new(format!("Are you sure you want to delete {}?\n\ny - delete    n - keep", what))
        .style(theme.warning())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Confirm Delete")
                .borders(Borders::ALL)
                .border_style(theme.error())
                .style(theme.base()),
        );
    f.render_widget(prompt, popup);
}
