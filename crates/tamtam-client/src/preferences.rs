//! Live preferences shared across the client.
//!
//! The [`PreferencesHandle`] keeps the current [`Preferences`] in a
//! `tokio::sync::watch` channel so that components depending on them (the
//! HTTP transport in particular) can react when the user edits a setting.

use std::sync::Arc;

use tokio::sync::watch;

use tamtam_store::{Database, Preferences, StoreError};

#[derive(Clone)]
pub struct PreferencesHandle {
    tx: Arc<watch::Sender<Preferences>>,
}

impl PreferencesHandle {
    pub fn new(initial: Preferences) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Preferences {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.tx.subscribe()
    }

    /// Edit the preferences, persist them and notify subscribers.
    ///
    /// Returns `false` (and writes nothing) when `edit` left them unchanged.
    pub fn update(
        &self,
        db: &Database,
        edit: impl FnOnce(&mut Preferences),
    ) -> Result<bool, StoreError> {
        let mut next = self.current();
        edit(&mut next);
        if next == *self.tx.borrow() {
            return Ok(false);
        }

        db.save_preferences(&next)?;
        tracing::info!(base_url = %next.base_url(), user = %next.user_id, "Preferences updated");
        self.tx.send_replace(next);
        Ok(true)
    }
}
