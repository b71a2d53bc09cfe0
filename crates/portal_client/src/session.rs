//! Who the visitor is, as far as this client knows.
//!
//! The session is only ever written by [`SessionService::refresh`],
//! [`SessionService::login`] and [`SessionService::logout`]. Every write is
//! published on a watch channel so header widgets can redraw.

use std::{sync::Arc, time::Duration};

use serde_json::Value;
use shared::{
    domain::{Identity, IdentityPayload, Session},
    envelope::EnvelopeStatus,
    protocol::LoginRequest,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    error::CallFailure,
    transport::{HttpMethod, Transport},
    Navigator, Notifier,
};

pub const CURRENT_USER_PATH: &str = "/user/current";
pub const LOGIN_PATH: &str = "/user/login";
pub const LOGOUT_PATH: &str = "/user/logout";

pub const MISSING_CREDENTIALS_NOTICE: &str = "Please enter username and password";
pub const LOGIN_OK_NOTICE: &str = "Login successful";
pub const LOGIN_FAILED_NOTICE: &str = "Login failed, please try again later";
pub const SWITCH_ACCOUNT_QUESTION: &str = "Log out and sign in with another account?";

pub struct SessionService {
    transport: Arc<Transport>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    default_avatar: String,
    login_page: String,
    landing_page: String,
    switch_account_delay: Duration,
    state: watch::Sender<Session>,
}

impl SessionService {
    pub fn new(
        transport: Arc<Transport>,
        settings: &Settings,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        initial: Session,
    ) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            transport,
            notifier,
            navigator,
            default_avatar: settings.default_avatar.clone(),
            login_page: settings.login_page.clone(),
            landing_page: settings.landing_page.clone(),
            switch_account_delay: settings.switch_account_delay(),
            state,
        }
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Receives the session after every write.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Probes `/user/current`. Any outcome other than a readable identity
    /// leaves the visitor anonymous; this never navigates away.
    pub async fn refresh(&self) {
        let probe = self
            .transport
            .fetch_envelope(HttpMethod::Get, CURRENT_USER_PATH)
            .await;
        let session = match probe {
            Ok(envelope) if envelope.status() == EnvelopeStatus::Success => {
                match serde_json::from_value::<IdentityPayload>(envelope.into_data()) {
                    Ok(payload) => {
                        let identity = Identity::from_payload(payload, &self.default_avatar);
                        Session::signed_in(identity)
                    }
                    Err(err) => {
                        warn!(error = %err, "unreadable identity in session probe");
                        Session::anonymous()
                    }
                }
            }
            Ok(envelope) => {
                debug!(status = ?envelope.status(), "session probe: not signed in");
                Session::anonymous()
            }
            Err(err) => {
                warn!(error = %err, "session probe failed");
                Session::anonymous()
            }
        };
        self.publish(session);
    }

    pub async fn login(&self, username: &str, password: &str) -> bool {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            self.notifier.inform(MISSING_CREDENTIALS_NOTICE);
            return false;
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let payload = match self
            .transport
            .try_call::<_, IdentityPayload>(HttpMethod::Post, LOGIN_PATH, &request)
            .await
        {
            Ok(payload) => payload,
            // The transport has already shown the backend's message or the
            // login redirect for these.
            Err(err @ (CallFailure::Rejected { .. } | CallFailure::AuthRequired)) => {
                warn!(username, error = %err, "login rejected");
                return false;
            }
            Err(err) => {
                warn!(username, error = %err, "login failed");
                self.notifier.inform(LOGIN_FAILED_NOTICE);
                return false;
            }
        };

        let identity = Identity::from_payload(payload, &self.default_avatar);
        info!(user_id = %identity.id, username = %identity.username, "logged in");
        self.publish(Session::signed_in(identity));
        self.notifier.inform(LOGIN_OK_NOTICE);
        true
    }

    /// Clears the session even when the backend call fails, then returns to
    /// the landing page.
    pub async fn logout(&self) {
        if self
            .transport
            .call::<_, Value>(HttpMethod::Post, LOGOUT_PATH, &())
            .await
            .is_none()
        {
            warn!("backend logout failed, clearing local session anyway");
        }
        self.publish(Session::anonymous());
        self.navigator.navigate(&self.landing_page);
    }

    /// Logs out and, after a short delay for the logout to settle, opens the
    /// login page. Returns false when the visitor declines.
    pub async fn switch_account(&self) -> bool {
        if !self.notifier.confirm(SWITCH_ACCOUNT_QUESTION) {
            return false;
        }
        self.logout().await;
        tokio::time::sleep(self.switch_account_delay).await;
        self.navigator.navigate(&self.login_page);
        true
    }

    fn publish(&self, session: Session) {
        self.state.send_replace(session);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
