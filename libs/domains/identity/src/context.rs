use tokio::sync::watch;

use crate::models::{CurrentUser, Session};

/// Current-session holder, created once at start-up and passed to the
/// components that need the signed-in user.
///
/// Observers subscribe to a `watch` channel and see every sign-in and
/// sign-out.
#[derive(Debug, Clone)]
pub struct SessionContext {
    tx: watch::Sender<Option<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn set(&self, session: Session) {
        tracing::debug!(user_id = %session.user.uid, "Session started");
        self.tx.send_replace(Some(session));
    }

    pub fn clear(&self) {
        if self.tx.send_replace(None).is_some() {
            tracing::debug!("Session cleared");
        }
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
