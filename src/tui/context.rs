//! Application-wide context shared by every screen

use tracing::info;

use crate::config::UiConfig;
use crate::session::Session;
use crate::tui::ui::Theme;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

/// Theme, notification preference, profile and session.
///
/// Created once by the application root, handed to every draw and key
/// handler, and torn down when the application exits.
#[derive(Debug)]
pub struct AppContext {
    pub theme: Theme,
    pub notifications: bool,
    pub profile: Profile,
    session: Option<Session>,
}

impl AppContext {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            theme: Theme::from_name(&ui.theme),
            notifications: ui.notifications,
            profile: Profile::default(),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn start_session(&mut self, session: Session) {
        if self.profile.email.is_empty() {
            self.profile.email = session.email.clone();
        }
        self.session = Some(session);
    }

    /// End the session, if any, and log the final preferences
    pub fn teardown(mut self) {
        if let Some(session) = self.session.take() {
            session.end();
        }
        info!(
            "Closing with theme={} notifications={}",
            self.theme.kind.as_str(),
            self.notifications
        );
    }
}
