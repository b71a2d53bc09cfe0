//! Request status indicators shown on the page.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

pub const LOADING_TEXT: &str = "Loading...";
pub const NETWORK_FAILURE_TEXT: &str = "Network error, please try again later";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorState {
    Hidden,
    Loading,
    Failed(String),
}

/// Which indicators a call drives.
///
/// `Page` touches every registered indicator, so concurrent page-scoped calls
/// overwrite each other and the last one to finish wins. `Named` touches a
/// single indicator and is what list pages use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorScope {
    Page,
    Named(&'static str),
}

#[derive(Debug, Default)]
pub struct IndicatorBoard {
    indicators: Mutex<BTreeMap<String, IndicatorState>>,
}

impl IndicatorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, name: &str) {
        self.indicators
            .lock()
            .await
            .entry(name.to_string())
            .or_insert(IndicatorState::Hidden);
    }

    pub async fn state(&self, name: &str) -> Option<IndicatorState> {
        self.indicators.lock().await.get(name).cloned()
    }

    pub async fn snapshot(&self) -> BTreeMap<String, IndicatorState> {
        self.indicators.lock().await.clone()
    }

    pub async fn begin(&self, scope: IndicatorScope) {
        self.set(scope, IndicatorState::Loading).await;
    }

    pub async fn succeed(&self, scope: IndicatorScope) {
        self.set(scope, IndicatorState::Hidden).await;
    }

    pub async fn fail(&self, scope: IndicatorScope, text: impl Into<String>) {
        self.set(scope, IndicatorState::Failed(text.into())).await;
    }

    async fn set(&self, scope: IndicatorScope, state: IndicatorState) {
        let mut guard = self.indicators.lock().await;
        match scope {
            IndicatorScope::Page => {
                for slot in guard.values_mut() {
                    *slot = state.clone();
                }
            }
            IndicatorScope::Named(name) => {
                guard.insert(name.to_string(), state);
            }
        }
    }
}
