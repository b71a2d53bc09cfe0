use std::sync::Arc;

use anyhow::Result;
use shared::domain::Session;
use tracing::{info, warn};

pub mod api;
pub mod config;
pub mod error;
pub mod indicator;
pub mod session;
pub mod transport;
pub mod view;

pub use api::users::AvatarUpload;
pub use config::{load_settings, prepare_base_url, Settings};
pub use error::{CallFailure, TransportError};
pub use indicator::{IndicatorBoard, IndicatorScope, IndicatorState};
pub use session::SessionService;
pub use transport::{HttpMethod, Params, Transport};

/// Surfaces messages to the visitor.
pub trait Notifier: Send + Sync {
    /// Blocking notice the visitor has to acknowledge.
    fn alert(&self, message: &str);
    /// Inline status message.
    fn inform(&self, message: &str);
    fn confirm(&self, question: &str) -> bool;
}

/// Moves the browsing context to another page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Writes notices to the log. Declines every confirmation.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(notice = message, "alert");
    }

    fn inform(&self, message: &str) {
        info!(notice = message, "inform");
    }

    fn confirm(&self, question: &str) -> bool {
        warn!(question, "confirmation requested without an interactive notifier");
        false
    }
}

pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, target: &str) {
        info!(destination = target, "navigation requested");
    }
}

pub struct PortalClient {
    settings: Settings,
    transport: Arc<Transport>,
    session: SessionService,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl PortalClient {
    pub fn new(settings: Settings) -> Result<Arc<Self>> {
        Self::new_with_dependencies(settings, Arc::new(LogNotifier), Arc::new(LogNavigator))
    }

    pub fn new_with_dependencies(
        settings: Settings,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Arc<Self>> {
        Self::new_with_session(settings, notifier, navigator, Session::anonymous())
    }

    /// Starts from a given session instead of an anonymous one.
    pub fn new_with_session(
        mut settings: Settings,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        session: Session,
    ) -> Result<Arc<Self>> {
        settings.base_url = prepare_base_url(&settings.base_url)?;
        let transport = Arc::new(Transport::new(
            settings.base_url.clone(),
            settings.login_page.clone(),
            Arc::new(IndicatorBoard::new()),
            Arc::clone(&notifier),
            Arc::clone(&navigator),
        )?);
        let session = SessionService::new(
            Arc::clone(&transport),
            &settings,
            Arc::clone(&notifier),
            Arc::clone(&navigator),
            session,
        );
        Ok(Arc::new(Self {
            settings,
            transport,
            session,
            notifier,
            navigator,
        }))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn indicators(&self) -> &IndicatorBoard {
        self.transport.indicators()
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Local login check for actions that need an account. Sends the visitor
    /// to the login page when there is none.
    pub(crate) fn require_login(&self) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        self.notifier.alert(transport::AUTH_REQUIRED_NOTICE);
        self.navigator.navigate(&self.settings.login_page);
        false
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
