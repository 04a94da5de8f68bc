use serde::{Deserialize, Serialize};

use super::auth::AuthSession;

/// State shared by every screen through the Dioxus context.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub session: Option<AuthSession>,
}

impl AppState {
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn login(&mut self, session: AuthSession) {
        self.session = Some(session);
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.session = persisted.session;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            session: self.session.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub session: Option<AuthSession>,
}
