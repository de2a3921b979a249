//! Form field component for user input

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::ui::Theme;

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    /// Text rendered masked
    Secret,
    /// Fixed set of options cycled with ←/→
    Dropdown,
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub options: Vec<String>,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(label: &str, field_type: FormFieldType) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            is_focused: false,
            cursor_position: 0,
            options: Vec::new(),
            validation_error: None,
        }
    }

    pub fn text(label: &str) -> Self {
        Self::new(label, FormFieldType::Text)
    }

    pub fn secret(label: &str) -> Self {
        Self::new(label, FormFieldType::Secret)
    }

    /// Dropdown preselecting `selected`, or the first option when it is not offered
    pub fn dropdown(label: &str, options: Vec<String>, selected: &str) -> Self {
        let mut field = Self::new(label, FormFieldType::Dropdown);
        field.value = options
            .iter()
            .find(|o| o.as_str() == selected)
            .or_else(|| options.first())
            .cloned()
            .unwrap_or_default();
        field.options = options;
        field
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn set_value(&mut self, value: &str) {
        if self.field_type == FormFieldType::Dropdown && !self.options.iter().any(|o| o == value) {
            return;
        }
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
        self.validation_error = None;
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.field_type == FormFieldType::Dropdown || self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let at = self.byte_index();
        self.value.remove(at);
        self.validation_error = None;
    }

    pub fn delete_char_forward(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        if self.cursor_position < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    /// Empty a text field, or reset a dropdown to its first option
    pub fn clear(&mut self) {
        match self.field_type {
            FormFieldType::Dropdown => {
                self.value = self.options.first().cloned().unwrap_or_default();
            }
            _ => self.value.clear(),
        }
        self.cursor_position = 0;
        self.validation_error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Step to the next (or previous) dropdown option, wrapping around
    pub fn cycle_option(&mut self, forward: bool) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len();
        let current = self.options.iter().position(|o| *o == self.value);
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        self.value = self.options[next].clone();
    }

    /// Apply an editing key. Returns false when the key means nothing to the field.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.field_type == FormFieldType::Dropdown {
            return match key.code {
                KeyCode::Left => {
                    self.cycle_option(false);
                    true
                }
                KeyCode::Right | KeyCode::Char(' ') => {
                    self.cycle_option(true);
                    true
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.move_cursor_to_start(),
            KeyCode::End => self.move_cursor_to_end(),
            _ => return false,
        }
        true
    }

    fn display_value(&self) -> String {
        match self.field_type {
            FormFieldType::Secret => "•".repeat(self.value.chars().count()),
            FormFieldType::Dropdown => format!("◀ {} ▶", self.value),
            FormFieldType::Text => self.value.clone(),
        }
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let display_text = if showing_placeholder {
            self.placeholder.clone()
        } else {
            self.display_value()
        };

        let border_style = if self.is_focused {
            theme.active_border()
        } else if self.validation_error.is_some() {
            theme.error()
        } else {
            theme.inactive_border()
        };

        let title = if let Some(ref error) = self.validation_error {
            format!("{} - Error: {}", self.label, error)
        } else {
            self.label.clone()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if showing_placeholder {
            theme.inactive()
        } else {
            theme.text()
        };

        let paragraph = Paragraph::new(display_text).style(text_style).block(block);
        f.render_widget(paragraph, area);

        // Render cursor if focused and not a dropdown
        if self.is_focused && self.field_type != FormFieldType::Dropdown {
            let before: String = match self.field_type {
                FormFieldType::Secret => "•".repeat(self.cursor_position),
                _ => self.value.chars().take(self.cursor_position).collect(),
            };
            let cursor_x = area.x + 1 + before.width() as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// What a key did to a [`Form`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Submit,
    Cancel,
    Consumed,
    Ignored,
}

/// Form container that manages multiple fields
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
    active: bool,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
            active: true,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        let active = self.active;
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(active && i == self.current_field);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Give or take keyboard focus for the whole form
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.update_focus();
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.current_field = (self.current_field + 1) % self.fields.len();
            self.update_focus();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            let len = self.fields.len();
            self.current_field = (self.current_field + len - 1) % len;
            self.update_focus();
        }
    }

    pub fn focus_first(&mut self) {
        self.current_field = 0;
        self.update_focus();
    }

    /// Current value of a field, empty for out-of-range indices
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Trimmed value of a field
    pub fn trimmed(&self, index: usize) -> String {
        self.value(index).trim().to_string()
    }

    pub fn set_value(&mut self, index: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.set_value(value);
        }
    }

    pub fn set_error(&mut self, index: usize, error: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.validation_error = Some(error.to_string());
        }
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.validation_error = None;
        }
    }

    /// Reset every field and move focus back to the first one
    pub fn clear_all(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.focus_first();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                FormInput::Consumed
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.previous_field();
                FormInput::Consumed
            }
            KeyCode::Enter => FormInput::Submit,
            KeyCode::Esc => FormInput::Cancel,
            _ => match self.fields.get_mut(self.current_field) {
                Some(field) => {
                    if field.handle_key(key) {
                        FormInput::Consumed
                    } else {
                        FormInput::Ignored
                    }
                }
                None => FormInput::Ignored,
            },
        }
    }

    /// Render each field into the matching area
    pub fn render(&self, f: &mut Frame, areas: &[Rect], theme: &Theme) {
        for (field, area) in self.fields.iter().zip(areas.iter()) {
            field.render(f, *area, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut field = FormField::text("Name");
        for c in "Zoë Ha".chars() {
            field.insert_char(c);
        }
        field.move_cursor_left();
        field.move_cursor_left();
        field.delete_char();
        assert_eq!(field.value, "ZoëHa");

        field.move_cursor_to_start();
        field.delete_char_forward();
        assert_eq!(field.value, "oëHa");
        assert_eq!(field.cursor_position, 0);
    }

    #[test]
    fn test_dropdown_cycles_and_ignores_typing() {
        let options = vec!["approved".to_string(), "blocked".to_string(), "rejected".to_string()];
        let mut field = FormField::dropdown("Status", options, "blocked");
        assert_eq!(field.value, "blocked");

        assert!(field.handle_key(key(KeyCode::Right)));
        assert_eq!(field.value, "rejected");
        field.cycle_option(true);
        assert_eq!(field.value, "approved");
        field.cycle_option(false);
        assert_eq!(field.value, "rejected");

        assert!(!field.handle_key(key(KeyCode::Char('x'))));
        field.set_value("unknown");
        assert_eq!(field.value, "rejected");

        field.clear();
        assert_eq!(field.value, "approved");
    }

    #[test]
    fn test_form_routes_typing_to_focused_field() {
        let mut form = Form::new(vec![
            FormField::text("Name"),
            FormField::dropdown("Status", vec!["approved".to_string(), "blocked".to_string()], "approved"),
        ]);
        assert_eq!(form.handle_key(key(KeyCode::Char('Z'))), FormInput::Consumed);
        assert_eq!(form.handle_key(key(KeyCode::Backspace)), FormInput::Consumed);
        assert_eq!(form.handle_key(key(KeyCode::Char('Q'))), FormInput::Consumed);
        assert_eq!(form.value(0), "Q");

        form.next_field();
        assert_eq!(form.handle_key(key(KeyCode::Char('x'))), FormInput::Ignored);
        assert_eq!(form.handle_key(key(KeyCode::Right)), FormInput::Consumed);
        assert_eq!(form.value(1), "blocked");

        let mut empty = Form::new(Vec::new());
        assert_eq!(empty.handle_key(key(KeyCode::Char('a'))), FormInput::Ignored);
    }

    #[test]
    fn test_form_navigation_and_submit() {
        let mut form = Form::new(vec![FormField::text("Name"), FormField::text("Email")]);
        assert!(form.fields[0].is_focused);

        form.handle_key(key(KeyCode::Char('A')));
        assert_eq!(form.handle_key(key(KeyCode::Tab)), FormInput::Consumed);
        form.handle_key(key(KeyCode::Char('a')));
        form.handle_key(key(KeyCode::Char('@')));
        assert_eq!(form.value(0), "A");
        assert_eq!(form.value(1), "a@");

        assert_eq!(form.handle_key(key(KeyCode::BackTab)), FormInput::Consumed);
        assert_eq!(form.current_field, 0);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormInput::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormInput::Cancel);

        form.set_active(false);
        assert!(form.fields.iter().all(|f| !f.is_focused));

        form.clear_all();
        assert_eq!(form.value(1), "");
        assert_eq!(form.current_field, 0);
    }
}
