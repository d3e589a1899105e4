//! Application context: one identity directory and one task store over the
//! same records, kept in step by forwarding auth events.

use std::rc::Rc;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::{AuthOutcome, IdentityDirectory};
use crate::model::{PublicUser, UserId};
use crate::storage::RecordStore;
use crate::store::TaskStore;

pub struct App<S: RecordStore + Clone> {
    identity: IdentityDirectory<S>,
    store: TaskStore<S>,
}

impl<S: RecordStore + Clone> App<S> {
    /// Restore any saved session and load that user's tasks.
    pub fn open(records: S, clock: Rc<dyn Clock>, config: &Config) -> Self {
        let keys = config.keys();
        let identity = IdentityDirectory::new(records.clone(), keys.clone(), Rc::clone(&clock));
        let mut store = TaskStore::new(records, keys, clock);
        store.load(identity.current_user_id());
        Self { identity, store }
    }

    pub fn identity(&self) -> &IdentityDirectory<S> {
        &self.identity
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> AuthOutcome {
        self.identity.register(name, email, password)
    }

    pub fn login(&mut self, email: &str, password: &str) -> AuthOutcome {
        let outcome = self.identity.login(email, password);
        if let Some(event) = &outcome.event {
            self.store.handle_auth_event(event);
        }
        outcome
    }

    pub fn logout(&mut self) {
        let event = self.identity.logout();
        self.store.handle_auth_event(&event);
    }

    /// The signed-in user, or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<&PublicUser> {
        self.identity.current_user().ok_or(Error::NotAuthenticated)
    }

    pub fn require_user_id(&self) -> Result<&UserId> {
        self.identity
            .current_user_id()
            .ok_or(Error::NotAuthenticated)
    }
}
