use serde_json::Value;
use shared::{
    domain::CollectionId,
    protocol::{Collection, CollectionDraft, Identified, Page, PageQuery},
};

use crate::{
    error::CallFailure, indicator::IndicatorScope, transport::HttpMethod, PortalClient,
};

pub const COLLECTION_PATH: &str = "/culture-collection";

impl PortalClient {
    pub async fn list_collections(&self) -> Option<Vec<Collection>> {
        self.fetch_list(IndicatorScope::Page, COLLECTION_PATH).await
    }

    pub async fn collection_page(&self, query: &PageQuery) -> Option<Page<Collection>> {
        self.transport()
            .call(HttpMethod::Get, &format!("{COLLECTION_PATH}/page"), query)
            .await
    }

    pub async fn collection(&self, id: CollectionId) -> Option<Collection> {
        self.try_collection(id).await.ok()
    }

    pub async fn try_collection(&self, id: CollectionId) -> Result<Collection, CallFailure> {
        self.transport()
            .try_call(HttpMethod::Get, &format!("{COLLECTION_PATH}/{id}"), &())
            .await
    }

    pub async fn create_collection(&self, draft: &CollectionDraft) -> Option<Value> {
        self.validated(draft.validate()).ok()?;
        self.transport()
            .call(HttpMethod::Post, COLLECTION_PATH, draft)
            .await
    }

    pub async fn update_collection(
        &self,
        id: CollectionId,
        draft: &CollectionDraft,
    ) -> Option<Value> {
        self.try_update_collection(id, draft).await.ok()
    }

    pub async fn try_update_collection(
        &self,
        id: CollectionId,
        draft: &CollectionDraft,
    ) -> Result<Value, CallFailure> {
        self.validated(draft.validate())?;
        self.transport()
            .try_call(HttpMethod::Put, COLLECTION_PATH, &Identified { id, body: draft })
            .await
    }

    pub async fn delete_collection(&self, id: CollectionId) -> Option<Value> {
        self.transport()
            .call(HttpMethod::Delete, &format!("{COLLECTION_PATH}/{id}"), &())
            .await
    }
}
