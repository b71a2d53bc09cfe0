use serde_json::Value;
use shared::{
    domain::CheckInId,
    protocol::{CheckIn, CheckInDraft, Identified, Page, PageQuery},
};

use crate::{
    error::CallFailure, indicator::IndicatorScope, transport::HttpMethod, PortalClient,
};

pub const CHECK_IN_PATH: &str = "/check-in";

impl PortalClient {
    pub async fn list_check_ins(&self) -> Option<Vec<CheckIn>> {
        self.fetch_list(IndicatorScope::Page, CHECK_IN_PATH).await
    }

    pub async fn check_in_page(&self, query: &PageQuery) -> Option<Page<CheckIn>> {
        self.transport()
            .call(HttpMethod::Get, &format!("{CHECK_IN_PATH}/page"), query)
            .await
    }

    pub async fn check_in(&self, id: CheckInId) -> Option<CheckIn> {
        self.try_check_in(id).await.ok()
    }

    pub async fn try_check_in(&self, id: CheckInId) -> Result<CheckIn, CallFailure> {
        self.transport()
            .try_call(HttpMethod::Get, &format!("{CHECK_IN_PATH}/{id}"), &())
            .await
    }

    pub async fn create_check_in(&self, draft: &CheckInDraft) -> Option<Value> {
        self.validated(draft.validate()).ok()?;
        self.transport()
            .call(HttpMethod::Post, CHECK_IN_PATH, draft)
            .await
    }

    pub async fn update_check_in(&self, id: CheckInId, draft: &CheckInDraft) -> Option<Value> {
        self.try_update_check_in(id, draft).await.ok()
    }

    pub async fn try_update_check_in(
        &self,
        id: CheckInId,
        draft: &CheckInDraft,
    ) -> Result<Value, CallFailure> {
        self.validated(draft.validate())?;
        self.transport()
            .try_call(HttpMethod::Put, CHECK_IN_PATH, &Identified { id, body: draft })
            .await
    }

    pub async fn delete_check_in(&self, id: CheckInId) -> Option<Value> {
        self.transport()
            .call(HttpMethod::Delete, &format!("{CHECK_IN_PATH}/{id}"), &())
            .await
    }
}
