//! Profile and preference settings

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::info;

use crate::session::MIN_SIGNUP_PASSWORD_LEN;
use crate::sync::StatusMessage;
use crate::tui::{
    components::{message_style, Form, FormField, FormInput},
    context::{AppContext, Profile},
    traits::{ScreenAction, View},
    ui::{Theme, ThemeKind},
};

const NAME: usize = 0;
const EMAIL: usize = 1;
const PASSWORD: usize = 2;
const THEME: usize = 3;
const NOTIFICATIONS: usize = 4;

pub struct SettingsScreen {
    pub form: Form,
    pub message: Option<StatusMessage>,
}

impl Default for SettingsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsScreen {
    pub fn new() -> Self {
        let themes = vec!["light".to_string(), "dark".to_string()];
        let toggles = vec!["on".to_string(), "off".to_string()];
        let form = Form::new(vec![
            FormField::text("Full Name").with_placeholder("Enter your name"),
            FormField::text("Email").with_placeholder("Enter your email"),
            FormField::secret("New Password").with_placeholder("Leave empty to keep the current one"),
            FormField::dropdown("Theme", themes, "dark"),
            FormField::dropdown("Notifications", toggles, "on"),
        ]);
        Self { form, message: None }
    }

    /// Refill the form from the current context
    fn load(&mut self, ctx: &AppContext) {
        self.form.set_value(NAME, &ctx.profile.name);
        self.form.set_value(EMAIL, &ctx.profile.email);
        self.form.set_value(PASSWORD, "");
        self.form.set_value(THEME, ctx.theme.kind.as_str());
        self.form.set_value(NOTIFICATIONS, if ctx.notifications { "on" } else { "off" });
        self.form.clear_errors();
    }

    fn save(&mut self, ctx: &mut AppContext) -> ScreenAction {
        self.form.clear_errors();
        let email = self.form.trimmed(EMAIL);
        if !email.is_empty() && !email.contains('@') {
            self.form.set_error(EMAIL, "invalid");
            self.message = Some(StatusMessage::warning("Please enter a valid email address"));
            return ScreenAction::None;
        }
        let password = self.form.value(PASSWORD).to_string();
        if !password.is_empty() && password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
            self.form.set_error(PASSWORD, "too short");
            self.message = Some(StatusMessage::warning(format!(
                "Password must be at least {} characters",
                MIN_SIGNUP_PASSWORD_LEN
            )));
            return ScreenAction::None;
        }

        ctx.profile = Profile {
            name: self.form.trimmed(NAME),
            email,
        };
        if let Some(kind) = ThemeKind::parse(self.form.value(THEME)) {
            ctx.theme = Theme::new(kind);
        }
        ctx.notifications = self.form.value(NOTIFICATIONS) == "on";
        if !password.is_empty() {
            // Nothing stores credentials yet; the change is only acknowledged.
            info!("Password change requested for {}", ctx.profile.email);
            self.form.set_value(PASSWORD, "");
        }
        info!(
            "Settings saved: theme={} notifications={}",
            ctx.theme.kind.as_str(),
            ctx.notifications
        );

        let saved = StatusMessage::success("Settings saved");
        self.message = Some(saved.clone());
        ScreenAction::Notify(saved)
    }
}

impl View for SettingsScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let theme = &ctx.theme;
        let block = Block::default()
            .title("Settings")
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
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        self.form.render(f, &chunks[..5], theme);

        if let Some(message) = &self.message {
            f.render_widget(
                Paragraph::new(message.message.clone()).style(message_style(message, theme)),
                chunks[5],
            );
        }

        let hint = if self.form.is_active() {
            "Enter: save | Tab: next field | ←/→: change option | Esc: leave form"
        } else {
            "Enter: edit form"
        };
        f.render_widget(Paragraph::new(hint).style(theme.inactive()), chunks[6]);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ScreenAction {
        if !self.form.is_active() {
            if key.code == KeyCode::Enter {
                self.form.set_active(true);
            }
            return ScreenAction::None;
        }
        match self.form.handle_key(key) {
            FormInput::Submit => self.save(ctx),
            FormInput::Cancel => {
                self.form.set_active(false);
                ScreenAction::None
            }
            FormInput::Consumed | FormInput::Ignored => ScreenAction::None,
        }
    }

    fn on_enter(&mut self, ctx: &AppContext) {
        self.load(ctx);
        self.message = None;
        self.form.set_active(true);
    }

    fn is_editing_text(&self) -> bool {
        self.form.is_active()
    }

    fn help_text(&self) -> &'static str {
        "Settings:\n\
        Tab / Shift+Tab - Next / previous field\n\
        ←/→ - Change theme or notifications\n\
        Enter - Save settings (or re-enter the form)\n\
        Esc - Leave the form to use tab shortcuts"
    }
}
