//! Documents screen: searchable list with inline editing

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Cell, Row},
    Frame,
};

use crate::api::{DocumentsApi, Operation};
use crate::models::{Document, DocumentEdit};
use crate::sync::{ResourceMirror, StatusMessage, SyncEvent, SyncOutcome};
use crate::tui::{
    components::{Form, FormField, FormInput, ResourceTable, TableConfig},
    context::AppContext,
    events::AppEvent,
    operations::TaskRunner,
    traits::{Navigable, ScreenAction, View},
    ui::truncate,
};

use super::{draw_delete_prompt, next_facet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    Editing,
}

/// Row being edited in place
pub struct InlineEdit {
    pub id: u64,
    pub form: Form,
}

pub struct DocumentsScreen {
    pub mirror: ResourceMirror<Document>,
    pub table: ResourceTable,
    pub search: FormField,
    pub focus: Focus,
    pub editing: Option<InlineEdit>,
    runner: TaskRunner,
    api: DocumentsApi,
}

impl DocumentsScreen {
    pub fn new(runner: TaskRunner, api: DocumentsApi) -> Self {
        let config = TableConfig::new(
            "Documents",
            vec!["#", "Name", "Description", "Size", "Status"],
            vec![
                Constraint::Length(4),
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Length(12),
                Constraint::Length(14),
            ],
        );
        Self {
            mirror: ResourceMirror::new(),
            table: ResourceTable::new(config),
            search: FormField::text("Search").with_placeholder("Search documents..."),
            focus: Focus::List,
            editing: None,
            runner,
            api,
        }
    }

    pub fn reload(&mut self) {
        if self.mirror.begin_load() {
            self.runner.load(self.api.clone(), AppEvent::Documents);
        }
    }

    /// Fold a completed call into the screen, returning what to announce
    pub fn apply(&mut self, event: SyncEvent<Document>) -> Option<StatusMessage> {
        let outcome = self.mirror.apply(event);
        self.table.sync_len(self.mirror.filtered_len());

        match outcome {
            SyncOutcome::Loaded(_) | SyncOutcome::Busy => None,
            SyncOutcome::Failed {
                operation: Operation::Load,
                message,
            } => Some(StatusMessage::error(message)),
            SyncOutcome::Updated(id) => {
                if self.editing.as_ref().map(|e| e.id) == Some(id) {
                    self.editing = None;
                    self.focus = Focus::List;
                }
                self.mirror.write_message().cloned()
            }
            _ => self.mirror.write_message().cloned(),
        }
    }

    fn selected_document(&self) -> Option<&Document> {
        self.table.selected().and_then(|i| self.mirror.filtered_get(i))
    }

    /// Distinct non-empty statuses present in the list, sorted
    pub fn status_options(&self) -> Vec<String> {
        let mut statuses: Vec<String> = self
            .mirror
            .items()
            .iter()
            .map(|d| d.status.clone())
            .filter(|s| !s.trim().is_empty())
            .collect();
        statuses.sort();
        statuses.dedup();
        statuses
    }

    fn refresh_filter(&mut self) {
        self.mirror.set_query(self.search.value.clone());
        self.table.sync_len(self.mirror.filtered_len());
    }

    fn cycle_status_facet(&mut self) {
        let options = self.status_options();
        let next = next_facet(&self.mirror.facets().status, &options);
        self.mirror.update_facets(|facets| facets.status = next);
        self.table.sync_len(self.mirror.filtered_len());
    }

    fn start_edit(&mut self) -> ScreenAction {
        let Some(doc) = self.selected_document() else {
            return ScreenAction::None;
        };
        let id = doc.id;
        let form = Form::new(vec![
            FormField::text("Name").with_value(&doc.name),
            FormField::text("Description").with_value(&doc.description),
        ]);
        self.editing = Some(InlineEdit { id, form });
        self.focus = Focus::Editing;
        ScreenAction::None
    }

    fn save_edit(&mut self) -> ScreenAction {
        let Some(edit) = self.editing.as_mut() else {
            return ScreenAction::None;
        };
        edit.form.clear_errors();
        let changes = DocumentEdit {
            name: edit.form.trimmed(0),
            description: edit.form.trimmed(1),
        };
        if changes.name.is_empty() {
            edit.form.set_error(0, "required");
            return ScreenAction::Notify(StatusMessage::warning("Document name is required"));
        }

        let id = edit.id;
        if self.mirror.begin_write().is_err() {
            return ScreenAction::Notify(StatusMessage::warning("A previous submission is still in progress"));
        }
        self.runner.update(self.api.clone(), id, changes, AppEvent::Documents);
        ScreenAction::Notify(StatusMessage::loading("Saving document..."))
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> ScreenAction {
        let Some(edit) = self.editing.as_mut() else {
            self.focus = Focus::List;
            return ScreenAction::None;
        };
        match edit.form.handle_key(key) {
            FormInput::Submit => self.save_edit(),
            FormInput::Cancel => {
                self.editing = None;
                self.focus = Focus::List;
                ScreenAction::None
            }
            FormInput::Consumed | FormInput::Ignored => ScreenAction::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                self.focus = Focus::List;
                self.search.set_focus(false);
            }
            _ => {
                if self.search.handle_key(key) {
                    self.refresh_filter();
                }
            }
        }
        ScreenAction::None
    }

    fn handle_delete_prompt_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let Some(confirmation) = self.mirror.confirm_delete() else {
                    return ScreenAction::None;
                };
                if self.mirror.begin_write().is_err() {
                    return ScreenAction::Notify(StatusMessage::warning("A previous submission is still in progress"));
                }
                self.runner.remove(self.api.clone(), confirmation, AppEvent::Documents);
                ScreenAction::Notify(StatusMessage::loading("Deleting document..."))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mirror.cancel_delete();
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up => self.table.navigate_up(),
            KeyCode::Down => self.table.navigate_down(),
            KeyCode::Home => self.table.navigate_to_first(),
            KeyCode::End => self.table.navigate_to_last(),
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                self.search.set_focus(true);
                self.search.move_cursor_to_end();
            }
            KeyCode::Char('f') => self.cycle_status_facet(),
            KeyCode::Char('c') => {
                self.search.clear();
                self.mirror.update_facets(|facets| facets.status = None);
                self.refresh_filter();
            }
            KeyCode::Char('e') | KeyCode::Enter => return self.start_edit(),
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_document().map(|d| d.id) {
                    self.mirror.request_delete(id);
                }
            }
            KeyCode::Char('r') => {
                self.reload();
                return ScreenAction::Notify(StatusMessage::loading("Refreshing documents..."));
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn rows(&self, area: Rect) -> Vec<Row<'static>> {
        let name_width = (area.width as usize * 30 / 100).saturating_sub(1);
        let description_width = (area.width as usize * 40 / 100).saturating_sub(1);
        let editing_id = self.editing.as_ref().map(|e| e.id);

        self.mirror
            .filtered()
            .enumerate()
            .map(|(i, doc)| {
                let name = if editing_id == Some(doc.id) {
                    format!("✎ {}", doc.name)
                } else {
                    doc.name.clone()
                };
                Row::new(vec![
                    Cell::from((i + 1).to_string()),
                    Cell::from(truncate(&name, name_width)),
                    Cell::from(truncate(&doc.description, description_width)),
                    Cell::from(doc.size_display().to_string()),
                    Cell::from(doc.status.clone()),
                ])
            })
            .collect()
    }
}

impl View for DocumentsScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let theme = &ctx.theme;
        let editor_height = if self.editing.is_some() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(editor_height),
            ])
            .split(area);

        let mut search = self.search.clone();
        search.label = format!(
            "Search (/) | Status (f): {}",
            self.mirror.facets().status.as_deref().unwrap_or("All")
        );
        search.render(f, chunks[0], theme);

        if self.mirror.is_loading() {
            self.table.render_message(f, chunks[1], "Loading...", theme.inactive(), theme);
        } else if let Some(error) = self.mirror.error() {
            self.table.render_message(f, chunks[1], error, theme.error(), theme);
        } else {
            let rows = self.rows(chunks[1]);
            self.table.config.title = format!(
                "Documents ({} of {})",
                self.mirror.filtered_len(),
                self.mirror.items().len()
            );
            self.table.render(f, chunks[1], rows, theme, self.focus == Focus::List);
        }

        if let Some(edit) = &self.editing {
            let fields = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[2]);
            edit.form.render(f, &fields, theme);
        }

        if let Some(id) = self.mirror.pending_delete() {
            let what = self
                .mirror
                .get(id)
                .map(|d| format!("document \"{}\"", d.name))
                .unwrap_or_else(|| "this document".to_string());
            draw_delete_prompt(f, area, theme, &what);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> ScreenAction {
        if self.mirror.pending_delete().is_some() {
            return self.handle_delete_prompt_key(key);
        }
        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Editing => self.handle_editing_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    fn on_enter(&mut self, _ctx: &AppContext) {
        self.reload();
    }

    fn is_editing_text(&self) -> bool {
        matches!(self.focus, Focus::Search | Focus::Editing) || self.mirror.pending_delete().is_some()
    }

    fn help_text(&self) -> &'static str {
        "Documents:\n\
        ↑/↓ - Select document\n\
        / - Search name, description and status\n\
        f - Cycle status filter\n\
        c - Clear search and filter\n\
        e / Enter - Edit name and description in place\n\
        d - Delete (y to confirm, n to keep)\n\
        r - Reload\n\
        While editing: Tab next field, Enter save, Esc cancel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::{Config, UiConfig};
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn press(screen: &mut DocumentsScreen, code: KeyCode) -> ScreenAction {
        let mut ctx = AppContext::new(&UiConfig::default());
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &mut ctx)
    }

    fn doc(id: u64, name: &str, status: &str) -> Document {
        Document {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            size: None,
            status: status.to_string(),
            file_url: None,
        }
    }

    fn loaded_screen() -> (DocumentsScreen, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(&Config::default().with_api_url(Some("http://127.0.0.1:1".to_string()))).unwrap();
        let mut screen = DocumentsScreen::new(TaskRunner::new(tx), DocumentsApi::new(client));
        screen.mirror.begin_load();
        screen.apply(SyncEvent::Loaded(Ok(vec![
            doc(1, "Handbook", "Active"),
            doc(2, "Contract", "Archived"),
            doc(3, "Policy", "Active"),
        ])));
        (screen, rx)
    }

    #[tokio::test]
    async fn test_search_and_status_facet() {
        let (mut screen, _rx) = loaded_screen();

        press(&mut screen, KeyCode::Char('/'));
        assert!(screen.is_editing_text());
        for c in "POL".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        assert_eq!(screen.mirror.filtered_len(), 1);
        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.focus, Focus::List);

        press(&mut screen, KeyCode::Char('c'));
        assert_eq!(screen.mirror.filtered_len(), 3);

        assert_eq!(screen.status_options(), vec!["Active".to_string(), "Archived".to_string()]);
        press(&mut screen, KeyCode::Char('f'));
        assert_eq!(screen.mirror.facets().status.as_deref(), Some("Active"));
        assert_eq!(screen.mirror.filtered_len(), 2);
        press(&mut screen, KeyCode::Char('f'));
        press(&mut screen, KeyCode::Char('f'));
        assert_eq!(screen.mirror.facets().status, None);
    }

    #[tokio::test]
    async fn test_inline_edit_closes_after_acknowledged_update() {
        let (mut screen, _rx) = loaded_screen();
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Char('e'));
        assert_eq!(screen.editing.as_ref().unwrap().id, 2);

        press(&mut screen, KeyCode::Char('s'));
        let action = press(&mut screen, KeyCode::Enter);
        assert!(matches!(action, ScreenAction::Notify(_)));
        assert!(screen.mirror.is_writing());

        match press(&mut screen, KeyCode::Enter) {
            ScreenAction::Notify(m) => assert_eq!(m.message, "A previous submission is still in progress"),
            other => panic!("expected a warning, got {:?}", other),
        }

        let mut saved = doc(2, "Contracts", "Archived");
        saved.description = "Contract description".to_string();
        let message = screen
            .apply(SyncEvent::Updated {
                id: 2,
                result: Ok(saved.clone()),
            })
            .unwrap();
        assert_eq!(message.message, "Document updated");
        assert!(screen.editing.is_none());
        assert_eq!(screen.mirror.items()[1], saved);
        assert_eq!(screen.mirror.items()[0].name, "Handbook");
    }

    #[tokio::test]
    async fn test_confirmed_delete_reaches_remote_and_failure_keeps_row() {
        let (mut screen, mut rx) = loaded_screen();
        press(&mut screen, KeyCode::Char('d'));
        assert_eq!(screen.mirror.pending_delete(), Some(1));

        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(screen.mirror.pending_delete(), None);
        assert!(!screen.mirror.is_writing());

        press(&mut screen, KeyCode::Char('d'));
        press(&mut screen, KeyCode::Char('y'));
        assert!(screen.mirror.is_writing());

        let event = match rx.recv().await {
            Some(AppEvent::Documents(event)) => event,
            other => panic!("unexpected event {:?}", other),
        };
        let message = screen.apply(event).unwrap();
        assert_eq!(message.message, "Failed to delete document");
        assert_eq!(screen.mirror.items().len(), 3);
        assert!(!screen.mirror.is_writing());
    }
}
