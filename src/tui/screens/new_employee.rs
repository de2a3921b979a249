//! Form for adding an employee

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{info, warn};

use crate::api::{ApiError, EmployeesApi};
use crate::models::{AccessLevel, Employee, EmployeeStatus, NewEmployee};
use crate::sync::{StatusMessage, Submission};
use crate::tui::{
    components::{message_style, Form, FormField, FormInput},
    context::AppContext,
    events::AppEvent,
    operations::TaskRunner,
    traits::{ScreenAction, View},
};

const NAME: usize = 0;
const EMAIL: usize = 1;
const STATUS: usize = 2;
const ACCESS: usize = 3;

pub const ADD_SUCCEEDED: &str = "User added successfully!";
pub const ADD_FAILED: &str = "Error: Failed to add user";

pub struct NewEmployeeScreen {
    pub form: Form,
    pub submission: Submission,
    runner: TaskRunner,
    api: EmployeesApi,
}

fn build_form() -> Form {
    let statuses = EmployeeStatus::KNOWN.iter().map(|s| s.as_str().to_string()).collect();
    let roles = AccessLevel::KNOWN.iter().map(|a| a.as_str().to_string()).collect();
    Form::new(vec![
        FormField::text("Full Name").with_placeholder("Enter full name"),
        FormField::text("Email").with_placeholder("Enter email"),
        FormField::dropdown("Status", statuses, EmployeeStatus::default().as_str()),
        FormField::dropdown("Access Role", roles, AccessLevel::default().as_str()),
    ])
}

impl NewEmployeeScreen {
    pub fn new(runner: TaskRunner, api: EmployeesApi) -> Self {
        Self {
            form: build_form(),
            submission: Submission::new(),
            runner,
            api,
        }
    }

    fn draft(&self) -> NewEmployee {
        NewEmployee {
            name: self.form.trimmed(NAME),
            email: self.form.trimmed(EMAIL),
            status: EmployeeStatus::parse(self.form.value(STATUS)),
            access: AccessLevel::parse(self.form.value(ACCESS)),
        }
    }

    fn submit(&mut self) -> ScreenAction {
        self.form.clear_errors();
        let draft = self.draft();

        if draft.name.is_empty() || draft.email.is_empty() {
            let field = if draft.name.is_empty() { NAME } else { EMAIL };
            self.form.set_error(field, "required");
            self.submission.reject("Name and email are required.");
            return ScreenAction::None;
        }
        if !draft.email.contains('@') {
            self.form.set_error(EMAIL, "invalid");
            self.submission.reject("Please enter a valid email address.");
            return ScreenAction::None;
        }

        if self.submission.begin().is_err() {
            return ScreenAction::Notify(StatusMessage::warning("A previous submission is still in progress"));
        }
        info!("Adding employee {}", draft.email);
        self.runner.create(self.api.clone(), draft, AppEvent::EmployeeAdded);
        ScreenAction::None
    }

    /// Settle the outstanding submission; fields are cleared only on success
    pub fn apply(&mut self, result: Result<Employee, ApiError>) -> Option<StatusMessage> {
        match result {
            Ok(employee) => {
                info!("Employee {} added", employee.id);
                self.submission.succeed(ADD_SUCCEEDED);
                self.form = build_form();
            }
            Err(e) => {
                warn!("Adding employee failed: {}", e);
                self.submission.fail(ADD_FAILED);
            }
        }
        self.submission.message().cloned()
    }
}

impl View for NewEmployeeScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let theme = &ctx.theme;
        let block = Block::default()
            .title("Add Employee")
            .borders(Borders::ALL)
            .border_style(if self.form.is_active() {
                theme.active_border()
            } else {
                theme.inactive_border()
            });
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        self.form.render(f, &chunks[..4], theme);

        if self.submission.is_in_flight() {
            f.render_widget(Paragraph::new("⟳ Adding...").style(theme.warning()), chunks[4]);
        } else if let Some(message) = self.submission.message() {
            f.render_widget(
                Paragraph::new(message.message.clone()).style(message_style(message, theme)),
                chunks[4],
            );
        }

        let hint = if self.form.is_active() {
            "Enter: add | Tab: next field | ←/→: change option | Esc: leave form"
        } else {
            "Enter: edit form"
        };
        f.render_widget(Paragraph::new(hint).style(theme.inactive()), chunks[5]);
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> ScreenAction {
        if !self.form.is_active() {
            if key.code == KeyCode::Enter {
                self.form.set_active(true);
            }
            return ScreenAction::None;
        }
        match self.form.handle_key(key) {
            FormInput::Submit => self.submit(),
            FormInput::Cancel => {
                self.form.set_active(false);
                ScreenAction::None
            }
            FormInput::Consumed | FormInput::Ignored => ScreenAction::None,
        }
    }

    fn on_enter(&mut self, _ctx: &AppContext) {
        if !self.submission.is_in_flight() {
            self.submission.clear_message();
        }
        self.form.set_active(true);
    }

    fn is_editing_text(&self) -> bool {
        self.form.is_active()
    }

    fn help_text(&self) -> &'static str {
        "New Employee:\n\
        Tab / Shift+Tab - Next / previous field\n\
        ←/→ - Change status or access role\n\
        Enter - Add employee (or re-enter the form)\n\
        Esc - Leave the form to use tab shortcuts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::{Config, UiConfig};
    use crossterm::event::KeyModifiers;
    use mockito::Matcher;
    use tokio::sync::mpsc;

    fn screen_for(url: String) -> (NewEmployeeScreen, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(&Config::default().with_api_url(Some(url))).unwrap();
        (NewEmployeeScreen::new(TaskRunner::new(tx), EmployeesApi::new(client)), rx)
    }

    fn press(screen: &mut NewEmployeeScreen, code: KeyCode) -> ScreenAction {
        let mut ctx = AppContext::new(&UiConfig::default());
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &mut ctx)
    }

    #[test]
    fn test_defaults_are_approved_and_view() {
        let (screen, _rx) = screen_for("http://127.0.0.1:1".to_string());
        let draft = screen.draft();
        assert_eq!(draft.status, EmployeeStatus::Approved);
        assert_eq!(draft.access, AccessLevel::View);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_without_request() {
        let (mut screen, mut rx) = screen_for("http://127.0.0.1:1".to_string());
        screen.form.set_value(NAME, "Dana");
        screen.form.set_value(EMAIL, "dana.corp.io");
        press(&mut screen, KeyCode::Enter);

        assert_eq!(screen.submission.message().unwrap().message, "Please enter a valid email address.");
        assert!(!screen.submission.is_in_flight());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_add_employee_posts_json_and_resets_form() {
        let mut server = mockito::Server::new_async().await;
        let _create = server
            .mock("POST", "/employees")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Dana",
                "email": "dana@corp.io",
                "status": "blocked",
                "access": "view"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 4, "name": "Dana", "email": "dana@corp.io", "status": "blocked", "access": "view"}"#)
            .create_async()
            .await;

        let (mut screen, mut rx) = screen_for(server.url());
        screen.form.set_value(NAME, "Dana");
        screen.form.set_value(EMAIL, "dana@corp.io");
        screen.form.set_value(STATUS, "blocked");
        press(&mut screen, KeyCode::Enter);
        assert!(screen.submission.is_in_flight());

        let Some(AppEvent::EmployeeAdded(result)) = rx.recv().await else {
            panic!("expected a submission result");
        };
        let message = screen.apply(result).unwrap();
        assert_eq!(message.message, ADD_SUCCEEDED);
        assert_eq!(screen.form.value(NAME), "");
        assert_eq!(screen.form.value(STATUS), "approved");
    }

    #[tokio::test]
    async fn test_rejected_add_reports_failure_and_keeps_fields() {
        let mut server = mockito::Server::new_async().await;
        let _create = server
            .mock("POST", "/employees")
            .with_status(400)
            .with_body(r#"{"error": "Name and Email are required"}"#)
            .create_async()
            .await;

        let (mut screen, mut rx) = screen_for(server.url());
        screen.form.set_value(NAME, "Dana");
        screen.form.set_value(EMAIL, "dana@corp.io");
        press(&mut screen, KeyCode::Enter);

        let Some(AppEvent::EmployeeAdded(result)) = rx.recv().await else {
            panic!("expected a submission result");
        };
        assert_eq!(screen.apply(result).unwrap().message, ADD_FAILED);
        assert_eq!(screen.form.value(EMAIL), "dana@corp.io");
        assert!(!screen.submission.is_in_flight());
    }
}
