//! tf register/login/logout/whoami

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::context::{ensure_saved, load_context};
use crate::error::{Error, Result};
use crate::model::PublicUser;
use crate::output::{emit_success, HumanOutput};

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

pub struct RegisterOptions {
    pub name: String,
    pub email: String,
    pub password: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct LoginOptions {
    pub email: String,
    pub password: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for commands that only touch the session
pub struct SessionOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct AuthReport<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a PublicUser>,
}

#[derive(Serialize)]
struct WhoamiReport<'a> {
    authenticated: bool,
    user: Option<&'a PublicUser>,
}

/// Form checks applied before the directory sees the request.
fn validate_registration(name: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().chars().count() < MIN_NAME_CHARS {
        return Err(Error::Validation(format!(
            "name must be at least {MIN_NAME_CHARS} characters"
        )));
    }
    if !is_valid_email(email) {
        return Err(Error::Validation(format!("invalid email address '{email}'")));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(Error::Validation(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn run_register(options: RegisterOptions) -> Result<()> {
    validate_registration(&options.name, &options.email, &options.password)?;

    let mut ctx = load_context(options.data_dir, options.json, options.quiet);
    let outcome = ctx.app.register(
        options.name.trim(),
        options.email.trim(),
        &options.password,
    );
    if !outcome.success {
        return Err(Error::Validation(outcome.message));
    }

    let mut human = HumanOutput::new(outcome.message.clone());
    human.push_summary("email", options.email.trim().to_lowercase());
    human.push_next_step("tf login --email <email> --password <password>");

    emit_success(
        ctx.output,
        "register",
        &AuthReport {
            success: true,
            message: &outcome.message,
            user: None,
        },
        Some(&human),
    )
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.json, options.quiet);
    let outcome = ctx.app.login(options.email.trim(), &options.password);
    if !outcome.success {
        return Err(Error::Validation(outcome.message));
    }

    let user = ctx.app.require_user()?;
    let mut human = HumanOutput::new(format!("{} {}", outcome.message, user.name));
    human.push_summary("email", user.email.clone());
    human.push_summary("tasks", ctx.app.store().tasks().len().to_string());
    if let Err(err) = ensure_saved(ctx.app.store()) {
        human.push_warning(err.to_string());
    }
    human.push_next_step("tf board");

    emit_success(
        ctx.output,
        "login",
        &AuthReport {
            success: true,
            message: &outcome.message,
            user: Some(user),
        },
        Some(&human),
    )
}

pub fn run_logout(options: SessionOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.json, options.quiet);
    let was_signed_in = ctx.app.identity().is_authenticated();
    ctx.app.logout();

    let message = if was_signed_in {
        "Signed out."
    } else {
        "Not signed in."
    };
    let human = HumanOutput::new(message);

    emit_success(
        ctx.output,
        "logout",
        &AuthReport {
            success: true,
            message,
            user: None,
        },
        Some(&human),
    )
}

pub fn run_whoami(options: SessionOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.json, options.quiet);
    let user = ctx.app.identity().current_user();

    let mut human = match user {
        Some(user) => {
            let mut human = HumanOutput::new(format!("Signed in as {}", user.name));
            human.push_summary("email", user.email.clone());
            human.push_summary("member since", user.created_at.format("%Y-%m-%d").to_string());
            human
        }
        None => HumanOutput::new("Not signed in"),
    };
    if user.is_none() {
        human.push_next_step("tf login --email <email> --password <password>");
    }

    emit_success(
        ctx.output,
        "whoami",
        &WhoamiReport {
            authenticated: user.is_some(),
            user,
        },
        Some(&human),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b@mail.example.org"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada@example."));
        assert!(!is_valid_email("a da@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn registration_form_rules() {
        assert!(validate_registration("Al", "al@example.com", "secret").is_ok());
        assert!(matches!(
            validate_registration(" A ", "al@example.com", "secret"),
            Err(Error::Validation(_))
        ));
        assert!(validate_registration("Al", "al@example", "secret").is_err());
        assert!(validate_registration("Al", "al@example.com", "short").is_err());
    }
}
