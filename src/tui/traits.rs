//! Core traits for the deskboard TUI
//!
//! Every screen implements [`View`] so the application shell can draw it,
//! route keys to it and announce when it becomes active.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::sync::StatusMessage;
use crate::tui::app::Screen;
use crate::tui::context::AppContext;

/// Actions a screen asks the shell to perform after handling a key
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    NavigateTo(Screen),
    Quit,
    /// Show a message in the status bar
    Notify(StatusMessage),
    None,
}

/// A screen hosted by the application shell
pub trait View {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext);

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ScreenAction;

    /// Called whenever the screen becomes the active one
    fn on_enter(&mut self, _ctx: &AppContext) {}

    /// Whether keystrokes are currently going into a text field, which
    /// disables single-key global shortcuts
    fn is_editing_text(&self) -> bool {
        false
    }

    /// Screen-specific lines for the help popup
    fn help_text(&self) -> &'static str;
}

/// Trait for components with navigable rows
pub trait Navigable {
    fn navigate_up(&mut self);

    fn navigate_down(&mut self);

    fn get_selected_index(&self) -> Option<usize>;

    fn set_selected_index(&mut self, index: Option<usize>);

    fn get_item_count(&self) -> usize;

    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}
