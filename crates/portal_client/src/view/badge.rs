use std::sync::Arc;

use shared::domain::Session;
use tokio::task::JoinHandle;

use crate::PortalClient;

/// Header login indicator, derived from the session alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginBadge {
    SignedOut {
        login_href: String,
    },
    SignedIn {
        display_name: String,
        avatar_url: String,
    },
}

impl LoginBadge {
    pub fn from_session(session: &Session, login_page: &str) -> Self {
        match session.identity() {
            Some(identity) => Self::SignedIn {
                display_name: identity.display_name().to_string(),
                avatar_url: identity.avatar_url.clone(),
            },
            None => Self::SignedOut {
                login_href: login_page.to_string(),
            },
        }
    }
}

pub trait BadgeSurface: Send + Sync {
    fn draw(&self, badge: LoginBadge);
}

/// Draws the badge now and again after every session change. The task ends
/// when the client is dropped.
pub fn spawn_badge_redraw(client: &PortalClient, surface: Arc<dyn BadgeSurface>) -> JoinHandle<()> {
    let mut sessions = client.session().subscribe();
    let login_page = client.settings().login_page.clone();
    surface.draw(LoginBadge::from_session(
        &sessions.borrow_and_update(),
        &login_page,
    ));

    tokio::spawn(async move {
        while sessions.changed().await.is_ok() {
            let badge = LoginBadge::from_session(&sessions.borrow_and_update(), &login_page);
            surface.draw(badge);
        }
    })
}
