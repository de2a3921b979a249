//! Selectable table over the filtered view of a resource mirror

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::tui::{traits::Navigable, ui::Theme};

/// Column layout for a [`ResourceTable`]
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub widths: Vec<Constraint>,
}

impl TableConfig {
    pub fn new(title: &str, headers: Vec<&'static str>, widths: Vec<Constraint>) -> Self {
        Self {
            title: title.to_string(),
            headers,
            widths,
        }
    }
}

/// Table component tracking the selected row of a list that changes underneath it
pub struct ResourceTable {
    pub state: TableState,
    pub config: TableConfig,
    item_count: usize,
}

impl ResourceTable {
    pub fn new(config: TableConfig) -> Self {
        Self {
            state: TableState::default(),
            config,
            item_count: 0,
        }
    }

    /// Keep the selection inside a list that now holds `len` rows
    pub fn sync_len(&mut self, len: usize) {
        self.item_count = len;
        let selected = match (self.state.selected(), len) {
            (_, 0) => None,
            (Some(i), _) if i < len => Some(i),
            (Some(_), _) => Some(len - 1),
            (None, _) => Some(0),
        };
        self.state.select(selected);
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, rows: Vec<Row<'static>>, theme: &Theme, focused: bool) {
        let header = Row::new(
            self.config
                .headers
                .iter()
                .map(|h| Cell::from(*h).style(theme.title())),
        )
        .bottom_margin(1);

        let border_style = if focused {
            theme.active_border()
        } else {
            theme.inactive_border()
        };

        let block = Block::default()
            .title(self.config.title.clone())
            .borders(Borders::ALL)
            .border_style(border_style);

        let table = Table::new(rows, self.config.widths.clone())
            .header(header)
            .block(block)
            .style(theme.text())
            .highlight_style(theme.selected())
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.state);
    }

    /// Render a loading or error notice in place of the rows
    pub fn render_message(&self, f: &mut Frame, area: Rect, text: &str, style: Style, theme: &Theme) {
        let notice = Paragraph::new(text.to_string()).style(style).block(
            Block::default()
                .title(self.config.title.clone())
                .borders(Borders::ALL)
                .border_style(theme.inactive_border()),
        );
        f.render_widget(notice, area);
    }
}

impl Navigable for ResourceTable {
    fn navigate_up(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.item_count - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn navigate_down(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.item_count,
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.item_count
    }
}
