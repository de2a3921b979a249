//! Upload form for a new document

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{info, warn};

use crate::api::{ApiError, DocumentsApi};
use crate::models::Document;
use crate::sync::{StatusMessage, Submission};
use crate::tui::{
    components::{message_style, Form, FormField, FormInput},
    context::AppContext,
    events::AppEvent,
    operations::TaskRunner,
    traits::{ScreenAction, View},
};

const NAME: usize = 0;
const DESCRIPTION: usize = 1;
const FILE: usize = 2;

pub const UPLOAD_SUCCEEDED: &str = "Document uploaded successfully!";
pub const UPLOAD_FAILED: &str = "Error uploading document.";
pub const FILE_REQUIRED: &str = "Please upload a document.";

pub struct NewDocumentScreen {
    pub form: Form,
    pub submission: Submission,
    runner: TaskRunner,
    api: DocumentsApi,
}

impl NewDocumentScreen {
    pub fn new(runner: TaskRunner, api: DocumentsApi) -> Self {
        let form = Form::new(vec![
            FormField::text("Document Name").with_placeholder("Enter document name"),
            FormField::text("Description").with_placeholder("Enter document description"),
            FormField::text("Upload Document (file path)").with_placeholder("./contracts/lease.pdf"),
        ]);
        Self {
            form,
            submission: Submission::new(),
            runner,
            api,
        }
    }

    fn submit(&mut self) -> ScreenAction {
        self.form.clear_errors();
        let name = self.form.trimmed(NAME);
        let description = self.form.trimmed(DESCRIPTION);
        let path = self.form.trimmed(FILE);

        if path.is_empty() {
            self.form.set_error(FILE, "required");
            self.submission.reject(FILE_REQUIRED);
            return ScreenAction::None;
        }
        if name.is_empty() || description.is_empty() {
            let field = if name.is_empty() { NAME } else { DESCRIPTION };
            self.form.set_error(field, "required");
            self.submission.reject("Please enter a name and a description.");
            return ScreenAction::None;
        }
        let path = PathBuf::from(path);
        if !path.is_file() {
            self.form.set_error(FILE, "not found");
            self.submission.reject(format!("File not found: {}", path.display()));
            return ScreenAction::None;
        }

        if self.submission.begin().is_err() {
            return ScreenAction::Notify(StatusMessage::warning("A previous submission is still in progress"));
        }
        info!("Uploading {} as document \"{}\"", path.display(), name);
        self.runner.upload(self.api.clone(), name, description, path, AppEvent::DocumentUploaded);
        ScreenAction::None
    }

    /// Settle the outstanding upload; fields are cleared only on success
    pub fn apply(&mut self, result: Result<Document, ApiError>) -> Option<StatusMessage> {
        match result {
            Ok(document) => {
                info!("Document {} uploaded", document.id);
                self.submission.succeed(UPLOAD_SUCCEEDED);
                self.form.clear_all();
            }
            Err(e) => {
                warn!("Document upload failed: {}", e);
                self.submission.fail(UPLOAD_FAILED);
            }
        }
        self.submission.message().cloned()
    }
}

impl View for NewDocumentScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let theme = &ctx.theme;
        let block = Block::default()
            .title("Upload Document")
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
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        self.form.render(f, &chunks[..3], theme);

        if self.submission.is_in_flight() {
            f.render_widget(Paragraph::new("⟳ Uploading...").style(theme.warning()), chunks[3]);
        } else if let Some(message) = self.submission.message() {
            f.render_widget(
                Paragraph::new(message.message.clone()).style(message_style(message, theme)),
                chunks[3],
            );
        }

        let hint = if self.form.is_active() {
            "Enter: upload | Tab: next field | Esc: leave form"
        } else {
            "Enter: edit form"
        };
        f.render_widget(Paragraph::new(hint).style(theme.inactive()), chunks[4]);
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
        "New Document:\n\
        Tab / Shift+Tab - Next / previous field\n\
        Enter - Upload (or re-enter the form)\n\
        Esc - Leave the form to use tab shortcuts\n\
        The file is read from the given local path"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::{Config, UiConfig};
    use crossterm::event::KeyModifiers;
    use std::io::Write;
    use tokio::sync::mpsc;

    fn screen_for(url: String) -> (NewDocumentScreen, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(&Config::default().with_api_url(Some(url))).unwrap();
        (NewDocumentScreen::new(TaskRunner::new(tx), DocumentsApi::new(client)), rx)
    }

    fn press(screen: &mut NewDocumentScreen, code: KeyCode) -> ScreenAction {
        let mut ctx = AppContext::new(&UiConfig::default());
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &mut ctx)
    }

    fn fill(screen: &mut NewDocumentScreen, name: &str, description: &str, path: &str) {
        screen.form.set_value(NAME, name);
        screen.form.set_value(DESCRIPTION, description);
        screen.form.set_value(FILE, path);
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected_locally() {
        let (mut screen, mut rx) = screen_for("http://127.0.0.1:1".to_string());
        fill(&mut screen, "Lease", "Office lease", "");
        press(&mut screen, KeyCode::Enter);

        assert_eq!(screen.submission.message().unwrap().message, FILE_REQUIRED);
        assert!(!screen.submission.is_in_flight());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_successful_upload_clears_fields() {
        let mut server = mockito::Server::new_async().await;
        let _upload = server
            .mock("POST", "/documents")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 7, "name": "Lease", "description": "Office lease", "status": "Active"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4 lease").unwrap();

        let (mut screen, mut rx) = screen_for(server.url());
        fill(&mut screen, "Lease", "Office lease", &file.path().display().to_string());
        press(&mut screen, KeyCode::Enter);
        assert!(screen.submission.is_in_flight());

        press(&mut screen, KeyCode::Enter);
        assert!(screen.submission.is_in_flight());

        let result = match rx.recv().await {
            Some(AppEvent::DocumentUploaded(result)) => result,
            other => panic!("unexpected event {:?}", other),
        };
        let message = screen.apply(result).unwrap();
        assert_eq!(message.message, UPLOAD_SUCCEEDED);
        assert_eq!(screen.form.value(NAME), "");
        assert_eq!(screen.form.value(FILE), "");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"data").unwrap();

        let (mut screen, mut rx) = screen_for("http://127.0.0.1:1".to_string());
        fill(&mut screen, "Lease", "Office lease", &file.path().display().to_string());
        press(&mut screen, KeyCode::Enter);

        let Some(AppEvent::DocumentUploaded(result)) = rx.recv().await else {
            panic!("expected an upload result");
        };
        let message = screen.apply(result).unwrap();
        assert_eq!(message.message, UPLOAD_FAILED);
        assert!(message.is_error());
        assert_eq!(screen.form.value(NAME), "Lease");
    }
}
