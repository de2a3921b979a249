//! Employees screen: filterable list with a modal editor

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Cell, Clear, Row},
    Frame,
};

use crate::api::{EmployeesApi, Operation};
use crate::models::{AccessLevel, Employee, EmployeeStatus};
use crate::sync::{ResourceMirror, StatusMessage, SyncEvent, SyncOutcome};
use crate::tui::{
    components::{Form, FormField, FormInput, ResourceTable, TableConfig},
    context::AppContext,
    events::AppEvent,
    operations::TaskRunner,
    traits::{Navigable, ScreenAction, View},
    ui::{centered_rect, truncate, Theme},
};

use super::{draw_delete_prompt, next_facet};

const NAME: usize = 0;
const EMAIL: usize = 1;
const STATUS: usize = 2;
const ACCESS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    Editing,
}

/// Employee open in the edit modal
pub struct EmployeeEditor {
    pub id: u64,
    pub form: Form,
}

impl EmployeeEditor {
    fn open(employee: &Employee) -> Self {
        let form = Form::new(vec![
            FormField::text("Full Name").with_value(&employee.name),
            FormField::text("Email").with_value(&employee.email),
            FormField::dropdown("Status", status_options(&employee.status), employee.status.as_str()),
            FormField::dropdown("Access Role", access_options(&employee.access), employee.access.as_str()),
        ]);
        Self { id: employee.id, form }
    }

    /// Full replacement record built from the form
    fn record(&self) -> Employee {
        Employee {
            id: self.id,
            name: self.form.trimmed(NAME),
            email: self.form.trimmed(EMAIL),
            status: EmployeeStatus::parse(self.form.value(STATUS)),
            access: AccessLevel::parse(self.form.value(ACCESS)),
        }
    }
}

/// Known statuses, plus the current one when it is not among them
fn status_options(current: &EmployeeStatus) -> Vec<String> {
    let mut options: Vec<String> = EmployeeStatus::KNOWN.iter().map(|s| s.as_str().to_string()).collect();
    if let EmployeeStatus::Other(value) = current {
        options.push(value.clone());
    }
    options
}

/// Known access roles, plus the current one when it is not among them
fn access_options(current: &AccessLevel) -> Vec<String> {
    let mut options: Vec<String> = AccessLevel::KNOWN.iter().map(|a| a.as_str().to_string()).collect();
    if let AccessLevel::Other(value) = current {
        options.push(value.clone());
    }
    options
}

pub struct EmployeesScreen {
    pub mirror: ResourceMirror<Employee>,
    pub table: ResourceTable,
    pub search: FormField,
    pub focus: Focus,
    pub editor: Option<EmployeeEditor>,
    runner: TaskRunner,
    api: EmployeesApi,
}

impl EmployeesScreen {
    pub fn new(runner: TaskRunner, api: EmployeesApi) -> Self {
        let config = TableConfig::new(
            "All Employees",
            vec!["#", "Name", "Email", "Status", "Access"],
            vec![
                Constraint::Length(4),
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Length(12),
                Constraint::Length(10),
            ],
        );
        Self {
            mirror: ResourceMirror::new(),
            table: ResourceTable::new(config),
            search: FormField::text("Search").with_placeholder("Search by name or email"),
            focus: Focus::List,
            editor: None,
            runner,
            api,
        }
    }

    pub fn reload(&mut self) {
        if self.mirror.begin_load() {
            self.runner.load(self.api.clone(), AppEvent::Employees);
        }
    }

    /// Fold a completed call into the screen, returning what to announce
    pub fn apply(&mut self, event: SyncEvent<Employee>) -> Option<StatusMessage> {
        let outcome = self.mirror.apply(event);
        self.table.sync_len(self.mirror.filtered_len());

        match outcome {
            SyncOutcome::Loaded(_) | SyncOutcome::Busy => None,
            SyncOutcome::Failed {
                operation: Operation::Load,
                message,
            } => Some(StatusMessage::error(message)),
            SyncOutcome::Updated(id) => {
                if self.editor.as_ref().map(|e| e.id) == Some(id) {
                    self.editor = None;
                    self.focus = Focus::List;
                }
                self.mirror.write_message().cloned()
            }
            _ => self.mirror.write_message().cloned(),
        }
    }

    fn selected_employee(&self) -> Option<&Employee> {
        self.table.selected().and_then(|i| self.mirror.filtered_get(i))
    }

    fn refilter(&mut self) {
        self.table.sync_len(self.mirror.filtered_len());
    }

    fn save_edit(&mut self) -> ScreenAction {
        let Some(editor) = self.editor.as_mut() else {
            return ScreenAction::None;
        };
        editor.form.clear_errors();
        let record = editor.record();
        if record.name.is_empty() {
            editor.form.set_error(NAME, "required");
            return ScreenAction::Notify(StatusMessage::warning("Name is required"));
        }
        if !record.email.contains('@') {
            editor.form.set_error(EMAIL, "invalid");
            return ScreenAction::Notify(StatusMessage::warning("Please enter a valid email address"));
        }

        if self.mirror.begin_write().is_err() {
            return ScreenAction::Notify(StatusMessage::warning("A previous submission is still in progress"));
        }
        self.runner.update(self.api.clone(), record.id, record, AppEvent::Employees);
        ScreenAction::Notify(StatusMessage::loading("Saving employee..."))
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> ScreenAction {
        let Some(editor) = self.editor.as_mut() else {
            self.focus = Focus::List;
            return ScreenAction::None;
        };
        match editor.form.handle_key(key) {
            FormInput::Submit => self.save_edit(),
            FormInput::Cancel => {
                self.editor = None;
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
                    self.mirror.set_query(self.search.value.clone());
                    self.refilter();
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
                self.runner.remove(self.api.clone(), confirmation, AppEvent::Employees);
                ScreenAction::Notify(StatusMessage::loading("Deleting employee..."))
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
            KeyCode::Char('f') => {
                let next = next_facet(&self.mirror.facets().status, &EmployeeStatus::KNOWN);
                self.mirror.update_facets(|facets| facets.status = next);
                self.refilter();
            }
            KeyCode::Char('a') => {
                let next = next_facet(&self.mirror.facets().access, &AccessLevel::KNOWN);
                self.mirror.update_facets(|facets| facets.access = next);
                self.refilter();
            }
            KeyCode::Char('c') => {
                self.search.clear();
                self.mirror.set_query("");
                self.mirror.set_facets(Default::default());
                self.refilter();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(editor) = self.selected_employee().map(EmployeeEditor::open) {
                    self.editor = Some(editor);
                    self.focus = Focus::Editing;
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_employee().map(|e| e.id) {
                    self.mirror.request_delete(id);
                }
            }
            KeyCode::Char('r') => {
                self.reload();
                return ScreenAction::Notify(StatusMessage::loading("Refreshing employees..."));
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn rows(&self, area: Rect) -> Vec<Row<'static>> {
        let name_width = (area.width as usize * 30 / 100).saturating_sub(1);
        let email_width = (area.width as usize * 40 / 100).saturating_sub(1);

        self.mirror
            .filtered()
            .enumerate()
            .map(|(i, employee)| {
                Row::new(vec![
                    Cell::from((i + 1).to_string()),
                    Cell::from(truncate(&employee.name, name_width)),
                    Cell::from(truncate(&employee.email, email_width)),
                    Cell::from(employee.status.display().to_string()),
                    Cell::from(employee.access.display().to_string()),
                ])
            })
            .collect()
    }

    fn draw_editor(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let Some(editor) = &self.editor else {
            return;
        };
        let popup = centered_rect(60, 70, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title("Edit Employee (Enter: save, Esc: cancel, ←/→: change option)")
            .borders(Borders::ALL)
            .border_style(theme.active_border())
            .style(theme.base());
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let fields = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);
        editor.form.render(f, &fields[..4], theme);
    }
}

impl View for EmployeesScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let theme = &ctx.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let facets = self.mirror.facets();
        let mut search = self.search.clone();
        search.label = format!(
            "Search (/) | Status (f): {} | Access (a): {}",
            facets.status.as_ref().map_or("All Statuses", |s| s.as_str()),
            facets.access.as_ref().map_or("All Access Levels", |a| a.as_str()),
        );
        search.render(f, chunks[0], theme);

        if self.mirror.is_loading() {
            self.table.render_message(f, chunks[1], "Loading...", theme.inactive(), theme);
        } else if let Some(error) = self.mirror.error() {
            self.table.render_message(f, chunks[1], error, theme.error(), theme);
        } else {
            let rows = self.rows(chunks[1]);
            self.table.render(f, chunks[1], rows, theme, self.focus == Focus::List);
        }

        self.draw_editor(f, area, theme);

        if let Some(id) = self.mirror.pending_delete() {
            let what = self
                .mirror
                .get(id)
                .map(|e| format!("employee \"{}\"", e.name))
                .unwrap_or_else(|| "this employee".to_string());
            draw_delete_prompt(f, area, theme, &what);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> ScreenAction {
        if self.mirror.pending_delete().is_some() {
            return self.handle_delete_prompt_key(key);
        }
        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Editing => self.handle_editor_key(key),
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
        "Employees:\n\
        ↑/↓ - Select employee\n\
        / - Search name and email\n\
        f - Cycle status filter\n\
        a - Cycle access filter\n\
        c - Clear search and filters\n\
        e / Enter - Edit in a popup\n\
        d - Delete (y to confirm, n to keep)\n\
        r - Reload\n\
        In the popup: Tab next field, ←/→ change option, Enter save, Esc cancel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::{Config, UiConfig};
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn press(screen: &mut EmployeesScreen, code: KeyCode) -> ScreenAction {
        let mut ctx = AppContext::new(&UiConfig::default());
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &mut ctx)
    }

    fn employee(id: u64, name: &str, status: EmployeeStatus, access: AccessLevel) -> Employee {
        Employee {
            id,
            name: name.to_string(),
            email: format!("{}@corp.io", name.to_lowercase()),
            status,
            access,
        }
    }

    fn loaded_screen() -> (EmployeesScreen, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(&Config::default().with_api_url(Some("http://127.0.0.1:1".to_string()))).unwrap();
        let mut screen = EmployeesScreen::new(TaskRunner::new(tx), EmployeesApi::new(client));
        screen.mirror.begin_load();
        screen.apply(SyncEvent::Loaded(Ok(vec![
            employee(1, "Alice", EmployeeStatus::Approved, AccessLevel::Edit),
            employee(2, "Bob", EmployeeStatus::Blocked, AccessLevel::View),
            employee(3, "Cy", EmployeeStatus::Other("Active".to_string()), AccessLevel::View),
        ])));
        (screen, rx)
    }

    #[tokio::test]
    async fn test_facets_combine_with_search() {
        let (mut screen, _rx) = loaded_screen();

        press(&mut screen, KeyCode::Char('a'));
        press(&mut screen, KeyCode::Char('a'));
        assert_eq!(screen.mirror.facets().access, Some(AccessLevel::View));
        assert_eq!(screen.mirror.filtered_len(), 2);

        press(&mut screen, KeyCode::Char('f'));
        press(&mut screen, KeyCode::Char('f'));
        assert_eq!(screen.mirror.facets().status, Some(EmployeeStatus::Blocked));
        assert_eq!(screen.mirror.filtered().next().unwrap().name, "Bob");

        press(&mut screen, KeyCode::Char('/'));
        for c in "zzz".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        assert_eq!(screen.mirror.filtered_len(), 0);
        assert_eq!(screen.table.selected(), None);

        press(&mut screen, KeyCode::Esc);
        press(&mut screen, KeyCode::Char('c'));
        assert_eq!(screen.mirror.filtered_len(), 3);
    }

    #[tokio::test]
    async fn test_modal_edit_keeps_unknown_status_and_submits_full_record() {
        let (mut screen, mut rx) = loaded_screen();
        press(&mut screen, KeyCode::End);
        press(&mut screen, KeyCode::Char('e'));

        let editor = screen.editor.as_ref().unwrap();
        assert_eq!(editor.id, 3);
        assert_eq!(editor.form.value(STATUS), "Active");
        assert_eq!(editor.record().status, EmployeeStatus::Other("Active".to_string()));

        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Right);
        assert_eq!(screen.editor.as_ref().unwrap().form.value(STATUS), "approved");

        press(&mut screen, KeyCode::Enter);
        assert!(screen.mirror.is_writing());

        let event = match rx.recv().await {
            Some(AppEvent::Employees(event)) => event,
            other => panic!("unexpected event {:?}", other),
        };
        let message = screen.apply(event).unwrap();
        assert_eq!(message.message, "Failed to edit employee");
        assert!(screen.editor.is_some());
        assert_eq!(screen.mirror.items()[2].status, EmployeeStatus::Other("Active".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_email_is_not_sent() {
        let (mut screen, _rx) = loaded_screen();
        press(&mut screen, KeyCode::Char('e'));
        press(&mut screen, KeyCode::Tab);
        for _ in 0.."alice@corp.io".len() {
            press(&mut screen, KeyCode::Backspace);
        }
        let action = press(&mut screen, KeyCode::Enter);
        match action {
            ScreenAction::Notify(m) => assert_eq!(m.message, "Please enter a valid email address"),
            other => panic!("expected a warning, got {:?}", other),
        }
        assert!(!screen.mirror.is_writing());
    }
}
