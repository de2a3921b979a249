//! Local sign-in / sign-up stub
//!
//! The admin backend exposes no authentication endpoints, so a session only
//! records who signed in and when. Credentials are checked for shape and are
//! never sent anywhere or verified.

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::info;

pub const MIN_SIGNUP_PASSWORD_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter your password")]
    MissingPassword,

    #[error("Password must be at least {MIN_SIGNUP_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn as_str(&self) -> &str {
        match self {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Sign Up",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Only checked when signing up
    pub confirm_password: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub email: String,
    pub started_at: DateTime<Local>,
}

impl Session {
    pub fn sign_in(credentials: &Credentials) -> Result<Self, SessionError> {
        validate_email(&credentials.email)?;
        if credentials.password.is_empty() {
            return Err(SessionError::MissingPassword);
        }

        info!("Signed in as {} (local session, credentials not verified)", credentials.email.trim());
        Ok(Self {
            email: credentials.email.trim().to_string(),
            started_at: Local::now(),
        })
    }

    /// Check a sign-up form. Signing up never starts a session; the user is
    /// sent back to sign in.
    pub fn sign_up(credentials: &Credentials) -> Result<(), SessionError> {
        validate_email(&credentials.email)?;
        if credentials.password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
            return Err(SessionError::PasswordTooShort);
        }
        if credentials.password != credentials.confirm_password {
            return Err(SessionError::PasswordMismatch);
        }

        info!("Sign-up form accepted for {}", credentials.email.trim());
        Ok(())
    }

    pub fn end(self) {
        let minutes = Local::now().signed_duration_since(self.started_at).num_minutes();
        info!("Session for {} ended after {} minute(s)", self.email, minutes);
    }
}

fn validate_email(email: &str) -> Result<(), SessionError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(SessionError::InvalidEmail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str, confirm: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_sign_in_checks_shape_only() {
        let session = Session::sign_in(&credentials(" admin@corp.io ", "x", "")).unwrap();
        assert_eq!(session.email, "admin@corp.io");

        assert_eq!(
            Session::sign_in(&credentials("admin", "secret", "")).unwrap_err(),
            SessionError::InvalidEmail
        );
        assert_eq!(
            Session::sign_in(&credentials("admin@corp.io", "", "")).unwrap_err(),
            SessionError::MissingPassword
        );
    }

    #[test]
    fn test_sign_up_rules() {
        assert!(Session::sign_up(&credentials("new@corp.io", "longenough", "longenough")).is_ok());
        assert_eq!(
            Session::sign_up(&credentials("new@corp.io", "short", "short")).unwrap_err(),
            SessionError::PasswordTooShort
        );
        assert_eq!(
            Session::sign_up(&credentials("new@corp.io", "longenough", "different")).unwrap_err(),
            SessionError::PasswordMismatch
        );
        assert_eq!(
            Session::sign_up(&credentials("@corp.io", "longenough", "longenough")).unwrap_err(),
            SessionError::InvalidEmail
        );
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(AuthMode::SignIn.toggled(), AuthMode::SignUp);
        assert_eq!(AuthMode::SignUp.toggled().as_str(), "Sign In");
    }
}
