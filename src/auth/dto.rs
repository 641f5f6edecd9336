use lazy_static::lazy_static;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const MAX_PASSWORD_BYTES: usize = 1024;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").unwrap();
}

/// Request body for `POST /signup`. Unknown fields such as `id` are ignored.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: SecretString,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

/// Username and password that passed validation.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl SignupRequest {
    pub fn validate(self) -> Result<Credentials, AppError> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::Validation("username must not be empty".into()));
        }
        if !USERNAME_RE.is_match(&username) {
            return Err(AppError::Validation(
                "username must be at most 64 characters of letters, digits, '_', '.' or '-'"
                    .into(),
            ));
        }
        check_password(&self.password)?;
        Ok(Credentials {
            username,
            password: self.password,
        })
    }
}

impl LoginRequest {
    /// Shape checks only; the username format is not revealed at login.
    pub fn validate(self) -> Result<Credentials, AppError> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::Validation("username must not be empty".into()));
        }
        check_password(&self.password)?;
        Ok(Credentials {
            username,
            password: self.password,
        })
    }
}

fn check_password(password: &SecretString) -> Result<(), AppError> {
    let len = password.expose_secret().len();
    if len == 0 {
        return Err(AppError::Validation("password must not be empty".into()));
    }
    if len > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation("password too long".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    #[test]
    fn signup_accepts_and_trims_plain_usernames() {
        let creds = signup("  alice_01.b-c ", "x").validate().expect("valid");
        assert_eq!(creds.username, "alice_01.b-c");
    }

    #[test]
    fn signup_rejects_bad_usernames() {
        let long = "a".repeat(65);
        for bad in ["", "   ", "has space", "semi;colon", long.as_str()] {
            let err = signup(bad, "pw").validate().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{bad:?} accepted");
        }
    }

    #[test]
    fn signup_rejects_empty_or_huge_password() {
        assert!(matches!(signup("bob", "").validate(), Err(AppError::Validation(_))));
        let huge = "p".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(signup("bob", &huge).validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn login_does_not_check_username_charset() {
        let req = LoginRequest {
            username: "has space".into(),
            password: SecretString::new("pw".into()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn client_supplied_id_is_ignored() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000000","username":"alice","password":"secret1"}"#,
        )
        .expect("parse");
        assert_eq!(req.username, "alice");
    }

    #[test]
    fn debug_never_shows_password() {
        let req = signup("alice", "secret1");
        assert!(!format!("{req:?}").contains("secret1"));
    }
}
