//! Sign-in / sign-up screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::session::{AuthMode, Credentials, Session, SessionError};
use crate::sync::StatusMessage;
use crate::tui::{
    app::Screen,
    components::{message_style, Form, FormField, FormInput},
    context::AppContext,
    traits::{ScreenAction, View},
    ui::centered_rect,
};

const EMAIL: usize = 0;
const PASSWORD: usize = 1;
const CONFIRM: usize = 2;

pub struct LoginScreen {
    pub mode: AuthMode,
    pub form: Form,
    pub message: Option<StatusMessage>,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::SignIn,
            form: build_form(AuthMode::SignIn, ""),
            message: None,
        }
    }

    fn switch_mode(&mut self, mode: AuthMode) {
        let email = self.form.value(EMAIL).to_string();
        self.mode = mode;
        self.form = build_form(mode, &email);
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            email: self.form.value(EMAIL).to_string(),
            password: self.form.value(PASSWORD).to_string(),
            confirm_password: self.form.value(CONFIRM).to_string(),
        }
    }

    fn reject(&mut self, error: SessionError) {
        let field = match error {
            SessionError::InvalidEmail => EMAIL,
            SessionError::MissingPassword | SessionError::PasswordTooShort => PASSWORD,
            SessionError::PasswordMismatch => CONFIRM,
        };
        self.form.set_error(field, "invalid");
        self.message = Some(StatusMessage::warning(error.to_string()));
    }

    fn submit(&mut self, ctx: &mut AppContext) -> ScreenAction {
        self.form.clear_errors();
        let credentials = self.credentials();

        match self.mode {
            AuthMode::SignIn => match Session::sign_in(&credentials) {
                Ok(session) => {
                    ctx.start_session(session);
                    self.form = build_form(AuthMode::SignIn, "");
                    self.message = None;
                    ScreenAction::NavigateTo(Screen::Dashboard)
                }
                Err(e) => {
                    self.reject(e);
                    ScreenAction::None
                }
            },
            AuthMode::SignUp => match Session::sign_up(&credentials) {
                Ok(()) => {
                    self.switch_mode(AuthMode::SignIn);
                    self.message = Some(StatusMessage::success("Account created. Please sign in."));
                    ScreenAction::None
                }
                Err(e) => {
                    self.reject(e);
                    ScreenAction::None
                }
            },
        }
    }
}

fn build_form(mode: AuthMode, email: &str) -> Form {
    let mut fields = vec![
        FormField::text("Email")
            .with_placeholder("you@company.com")
            .with_value(email),
        FormField::secret("Password").with_placeholder("Enter password"),
    ];
    if mode == AuthMode::SignUp {
        fields.push(FormField::secret("Confirm Password").with_placeholder("Repeat password"));
    }
    Form::new(fields)
}

impl View for LoginScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let theme = &ctx.theme;
        let popup = centered_rect(60, 80, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" deskboard - {} ", self.mode.as_str()))
            .borders(Borders::ALL)
            .border_style(theme.active_border())
            .style(theme.base());
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let mut constraints: Vec<Constraint> = self.form.fields.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Length(2));
        constraints.push(Constraint::Length(2));
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        let field_count = self.form.fields.len();
        self.form.render(f, &chunks[..field_count], theme);

        if let Some(message) = &self.message {
            let line = Paragraph::new(message.message.clone()).style(message_style(message, theme));
            f.render_widget(line, chunks[field_count]);
        }

        let other = self.mode.toggled();
        let hints = Line::from(vec![
            Span::styled("Enter", theme.title()),
            Span::raw(": submit  "),
            Span::styled("Tab", theme.title()),
            Span::raw(": next field  "),
            Span::styled("F2", theme.title()),
            Span::raw(format!(": {}  ", other.as_str())),
            Span::styled("Ctrl+C", theme.title()),
            Span::raw(": quit"),
        ]);
        f.render_widget(Paragraph::new(hints).style(theme.inactive()), chunks[field_count + 1]);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ScreenAction {
        if key.code == KeyCode::F(2) {
            self.switch_mode(self.mode.toggled());
            self.message = None;
            return ScreenAction::None;
        }

        match self.form.handle_key(key) {
            FormInput::Submit => self.submit(ctx),
            FormInput::Cancel => {
                self.message = None;
                self.form.clear_errors();
                ScreenAction::None
            }
            FormInput::Consumed | FormInput::Ignored => ScreenAction::None,
        }
    }

    fn is_editing_text(&self) -> bool {
        true
    }

    fn help_text(&self) -> &'static str {
        "Sign In / Sign Up:\n\
        Tab / Shift+Tab - Next / previous field\n\
        Enter - Submit\n\
        F2 - Switch between sign in and sign up\n\
        Esc - Clear message"
    }
}
