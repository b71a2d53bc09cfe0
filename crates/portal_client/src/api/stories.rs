use serde_json::Value;
use shared::{
    domain::StoryId,
    protocol::{Page, PageQuery, Story, StoryDraft},
};

use crate::{
    error::CallFailure, indicator::IndicatorScope, transport::HttpMethod, PortalClient,
};

pub const STORY_PATH: &str = "/culture-story";

impl PortalClient {
    pub async fn list_stories(&self) -> Option<Vec<Story>> {
        self.fetch_list(IndicatorScope::Page, STORY_PATH).await
    }

    pub async fn story_page(&self, query: &PageQuery) -> Option<Page<Story>> {
        self.transport()
            .call(HttpMethod::Get, &format!("{STORY_PATH}/page"), query)
            .await
    }

    pub async fn story(&self, id: StoryId) -> Option<Story> {
        self.try_story(id).await.ok()
    }

    pub async fn try_story(&self, id: StoryId) -> Result<Story, CallFailure> {
        self.transport()
            .try_call(HttpMethod::Get, &format!("{STORY_PATH}/{id}"), &())
            .await
    }

    pub async fn create_story(&self, draft: &StoryDraft) -> Option<Value> {
        self.validated(draft.validate()).ok()?;
        self.transport()
            .call(HttpMethod::Post, STORY_PATH, &draft.create_request())
            .await
    }

    pub async fn update_story(&self, id: StoryId, draft: &StoryDraft) -> Option<Value> {
        self.try_update_story(id, draft).await.ok()
    }

    pub async fn try_update_story(
        &self,
        id: StoryId,
        draft: &StoryDraft,
    ) -> Result<Value, CallFailure> {
        self.validated(draft.validate())?;
        self.transport()
            .try_call(HttpMethod::Put, STORY_PATH, &draft.update_request(id))
            .await
    }

    pub async fn delete_story(&self, id: StoryId) -> Option<Value> {
        self.transport()
            .call(HttpMethod::Delete, &format!("{STORY_PATH}/{id}"), &())
            .await
    }

    /// Stories picked for today, by recommendation kind.
    pub async fn daily_recommendations(&self, kind: &str) -> Option<Vec<Story>> {
        let kind = kind.trim();
        if kind.is_empty() {
            return None;
        }
        self.transport()
            .call(HttpMethod::Get, &format!("{STORY_PATH}/daily/{kind}"), &())
            .await
    }

    /// Recommendations for the signed-in visitor. Anonymous visitors get
    /// `None` with no notice so the widget can show a neutral empty state.
    pub async fn personal_recommendations(&self) -> Option<Vec<Story>> {
        if !self.session().is_authenticated() {
            return None;
        }
        self.transport()
            .call(HttpMethod::Get, &format!("{STORY_PATH}/personal"), &())
            .await
    }
}
