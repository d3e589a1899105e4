//! Identity directory: registered users and the current session.
//!
//! Users live in one durable record (in registration order) and the active
//! session in another. Credentials are compared as plain text; this is a
//! local convenience login, not a security boundary.
//!
//! Validation failures (duplicate email, bad credentials) come back as an
//! [`AuthOutcome`] with `success == false`, never as an error.

use std::rc::Rc;

use serde::Serialize;

use crate::clock::Clock;
use crate::model::{AuthState, PublicUser, User, UserId};
use crate::storage::{read_json, write_json, RecordStore, StorageKeys};
use crate::store::AuthEvent;
use crate::subject::{Subject, SubscriptionId};

pub const MSG_EMAIL_TAKEN: &str = "Email already registered.";
pub const MSG_REGISTERED: &str = "Account created!";
pub const MSG_BAD_CREDENTIALS: &str = "Invalid email or password.";
pub const MSG_WELCOME: &str = "Welcome back!";

/// Result of a register or login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
    /// Set on successful login so the caller can forward it to the task store.
    #[serde(skip)]
    pub event: Option<AuthEvent>,
}

impl AuthOutcome {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            event: None,
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            event: None,
        }
    }
}

pub struct IdentityDirectory<S: RecordStore> {
    records: S,
    keys: StorageKeys,
    clock: Rc<dyn Clock>,
    state: Subject<AuthState>,
}

impl<S: RecordStore> IdentityDirectory<S> {
    /// Open the directory and restore a previously saved session, if any.
    pub fn new(records: S, keys: StorageKeys, clock: Rc<dyn Clock>) -> Self {
        let mut directory = Self {
            records,
            keys,
            clock,
            state: Subject::new(AuthState::default()),
        };
        directory.restore_session();
        directory
    }

    fn restore_session(&mut self) {
        let key = self.keys.session();
        let restored = match self.records.read(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<AuthState>(&raw) {
                Ok(state) => Some(state),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "session record corrupt, discarding");
                    if let Err(err) = self.records.remove(&key) {
                        tracing::warn!(key = %key, error = %err, "failed to discard session record");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "session record unreadable");
                None
            }
        };

        let Some(state) = restored else {
            return;
        };
        match state.user_id() {
            Some(user) => tracing::debug!(user = %user, "session restored"),
            None => return,
        }
        self.state.publish(state);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.value().is_authenticated
    }

    pub fn current_user(&self) -> Option<&PublicUser> {
        let state = self.state.value();
        if !state.is_authenticated {
            return None;
        }
        state.user.as_ref()
    }

    pub fn current_user_id(&self) -> Option<&UserId> {
        self.state.value().user_id()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&AuthState) + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// All registered users; a missing or corrupt record reads as none.
    pub fn users(&self) -> Vec<User> {
        read_json(&self.records, &self.keys.users()).unwrap_or_default()
    }

    /// Add an account. Emails are unique ignoring case and stored lowercased.
    /// Registering does not sign the user in.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> AuthOutcome {
        let mut users = self.users();
        let email = email.to_lowercase();
        if users.iter().any(|user| user.email.to_lowercase() == email) {
            return AuthOutcome::rejected(MSG_EMAIL_TAKEN);
        }

        let user = User {
            id: UserId::generate(),
            email,
            name: name.to_string(),
            password: password.to_string(),
            created_at: self.clock.now(),
        };
        tracing::debug!(user = %user.id, "registered user");
        users.push(user);

        let key = self.keys.users();
        if let Err(err) = write_json(&self.records, &key, &users) {
            tracing::warn!(key = %key, error = %err, "failed to persist users");
        }
        AuthOutcome::ok(MSG_REGISTERED)
    }

    pub fn login(&mut self, email: &str, password: &str) -> AuthOutcome {
        let email = email.to_lowercase();
        let Some(user) = self
            .users()
            .into_iter()
            .find(|user| user.email.to_lowercase() == email && user.password == password)
        else {
            return AuthOutcome::rejected(MSG_BAD_CREDENTIALS);
        };

        let state = AuthState::signed_in(user.public());
        let key = self.keys.session();
        if let Err(err) = write_json(&self.records, &key, &state) {
            tracing::warn!(key = %key, error = %err, "failed to persist session");
        }
        self.state.publish(state);

        let mut outcome = AuthOutcome::ok(MSG_WELCOME);
        outcome.event = Some(AuthEvent::LoggedIn(user.id));
        outcome
    }

    pub fn logout(&mut self) -> AuthEvent {
        let key = self.keys.session();
        if let Err(err) = self.records.remove(&key) {
            tracing::warn!(key = %key, error = %err, "failed to remove session");
        }
        self.state.publish(AuthState::default());
        AuthEvent::LoggedOut
    }
}
