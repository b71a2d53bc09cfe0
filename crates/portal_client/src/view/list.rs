use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::error::ValidationError;
use tracing::debug;

use crate::{indicator::IndicatorScope, view::form::{FormData, FormSlot}, PortalClient};

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: i64,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Rows(Vec<ListRow>),
    Empty(&'static str),
    Error(&'static str),
}

/// The list container a page renders into.
pub trait ListSurface: Send + Sync {
    fn render(&self, state: ListState);
}

/// What a list page shows and how its create form maps to a request.
#[async_trait]
pub trait ListResource: Send + Sync + 'static {
    type Record: Send;
    type Draft: Send + Sync;

    /// Indicator driven by this page's list fetch.
    const INDICATOR: &'static str;
    const EMPTY_MESSAGE: &'static str;
    const ERROR_MESSAGE: &'static str;

    async fn fetch(&self, client: &PortalClient, scope: IndicatorScope)
        -> Option<Vec<Self::Record>>;
    fn row(&self, record: &Self::Record) -> ListRow;
    fn draft(&self, form: &FormData) -> Result<Self::Draft, ValidationError>;
    async fn create(&self, client: &PortalClient, draft: &Self::Draft) -> Option<Value>;
}

pub struct ListPage<R: ListResource> {
    client: Arc<PortalClient>,
    resource: R,
    surface: Arc<dyn ListSurface>,
    form: Arc<FormSlot>,
}

impl<R: ListResource> ListPage<R> {
    pub fn new(
        client: Arc<PortalClient>,
        resource: R,
        surface: Arc<dyn ListSurface>,
        form: Arc<FormSlot>,
    ) -> Self {
        Self {
            client,
            resource,
            surface,
            form,
        }
    }

    pub fn form(&self) -> &FormSlot {
        &self.form
    }

    /// Page entry: session first, then the list.
    pub async fn enter(&self) {
        self.client.session().refresh().await;
        self.initialize().await;
    }

    pub async fn initialize(&self) {
        self.surface.render(ListState::Loading);
        let scope = IndicatorScope::Named(R::INDICATOR);
        let state = match self.resource.fetch(&self.client, scope).await {
            Some(records) if records.is_empty() => ListState::Empty(R::EMPTY_MESSAGE),
            Some(records) => ListState::Rows(
                records
                    .iter()
                    .map(|record| self.resource.row(record))
                    .collect(),
            ),
            None => ListState::Error(R::ERROR_MESSAGE),
        };
        self.surface.render(state);

        if self.form.bind() {
            debug!(page = R::INDICATOR, "create form bound");
        }
    }

    /// The create form's submit handler. Does nothing until the page has
    /// initialized and attached it.
    pub async fn submit(&self) -> bool {
        if !self.form.is_bound() {
            return false;
        }
        let data = self.form.read().await;
        let Ok(draft) = self.client.validated(self.resource.draft(&data)) else {
            return false;
        };
        if self.resource.create(&self.client, &draft).await.is_none() {
            return false;
        }
        self.form.reset().await;
        self.initialize().await;
        true
    }
}

#[cfg(test)]
#[path = "../tests/view_tests.rs"]
mod tests;
