//! The four list pages of the site.

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::CheckInId,
    error::{require_text, ValidationError},
    protocol::{
        CheckIn, CheckInDraft, Collection, CollectionDraft, Footprint, FootprintDraft, Story,
        StoryDraft,
    },
};

use crate::{
    api::{
        check_ins::CHECK_IN_PATH, collections::COLLECTION_PATH, stories::STORY_PATH,
    },
    indicator::IndicatorScope,
    view::{
        form::FormData,
        list::{ListResource, ListRow},
    },
    PortalClient,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn story_draft(form: &FormData) -> Result<StoryDraft, ValidationError> {
    require_text("title", form.text("title"))?;
    require_text("content", form.text("content"))?;
    Ok(StoryDraft {
        title: form.text("title").to_string(),
        content: form.text("content").to_string(),
        author: form.optional("author"),
        category: form.optional("category"),
        reason: form.optional("reason"),
        image_url: form.optional("imageUrl"),
    })
}

pub fn check_in_draft(form: &FormData) -> Result<CheckInDraft, ValidationError> {
    require_text("name", form.text("name"))?;
    require_text("location", form.text("location"))?;
    Ok(CheckInDraft {
        name: form.text("name").to_string(),
        location: form.text("location").to_string(),
        description: form.optional("description"),
        image_url: form.optional("imageUrl"),
        latitude: form.number("latitude")?,
        longitude: form.number("longitude")?,
    })
}

pub fn collection_draft(form: &FormData) -> Result<CollectionDraft, ValidationError> {
    require_text("name", form.text("name"))?;
    Ok(CollectionDraft {
        name: form.text("name").to_string(),
        price: form.required_number("price")?,
        stock: form.number("stock")?,
        description: form.optional("description"),
        image_url: form.optional("imageUrl"),
        category: form.optional("category"),
    })
}

pub fn footprint_draft(form: &FormData) -> Result<FootprintDraft, ValidationError> {
    Ok(FootprintDraft {
        check_in_id: CheckInId(form.required_number("checkInId")?),
        note: form.optional("note"),
    })
}

pub struct StoryList;

#[async_trait]
impl ListResource for StoryList {
    type Record = Story;
    type Draft = StoryDraft;

    const INDICATOR: &'static str = "story-list";
    const EMPTY_MESSAGE: &'static str = "No stories yet";
    const ERROR_MESSAGE: &'static str = "Could not load stories, please try again later";

    async fn fetch(&self, client: &PortalClient, scope: IndicatorScope) -> Option<Vec<Story>> {
        client.fetch_list(scope, STORY_PATH).await
    }

    fn row(&self, story: &Story) -> ListRow {
        ListRow {
            id: story.id.0,
            title: story.title.clone(),
            detail: story
                .recommend_reason
                .clone()
                .or_else(|| story.author.clone())
                .unwrap_or_default(),
        }
    }

    fn draft(&self, form: &FormData) -> Result<StoryDraft, ValidationError> {
        story_draft(form)
    }

    async fn create(&self, client: &PortalClient, draft: &StoryDraft) -> Option<Value> {
        client.create_story(draft).await
    }
}

pub struct CheckInList;

#[async_trait]
impl ListResource for CheckInList {
    type Record = CheckIn;
    type Draft = CheckInDraft;

    const INDICATOR: &'static str = "check-in-list";
    const EMPTY_MESSAGE: &'static str = "No check-in spots yet";
    const ERROR_MESSAGE: &'static str = "Could not load check-in spots, please try again later";

    async fn fetch(&self, client: &PortalClient, scope: IndicatorScope) -> Option<Vec<CheckIn>> {
        client.fetch_list(scope, CHECK_IN_PATH).await
    }

    fn row(&self, check_in: &CheckIn) -> ListRow {
        ListRow {
            id: check_in.id.0,
            title: check_in.name.clone(),
            detail: check_in.location.clone().unwrap_or_default(),
        }
    }

    fn draft(&self, form: &FormData) -> Result<CheckInDraft, ValidationError> {
        check_in_draft(form)
    }

    async fn create(&self, client: &PortalClient, draft: &CheckInDraft) -> Option<Value> {
        client.create_check_in(draft).await
    }
}

pub struct CollectionList;

#[async_trait]
impl ListResource for CollectionList {
    type Record = Collection;
    type Draft = CollectionDraft;

    const INDICATOR: &'static str = "collection-list";
    const EMPTY_MESSAGE: &'static str = "No collections yet";
    const ERROR_MESSAGE: &'static str = "Could not load collections, please try again later";

    async fn fetch(
        &self,
        client: &PortalClient,
        scope: IndicatorScope,
    ) -> Option<Vec<Collection>> {
        client.fetch_list(scope, COLLECTION_PATH).await
    }

    fn row(&self, collection: &Collection) -> ListRow {
        ListRow {
            id: collection.id.0,
            title: collection.name.clone(),
            detail: format!("{:.2} (stock {})", collection.price, collection.stock),
        }
    }

    fn draft(&self, form: &FormData) -> Result<CollectionDraft, ValidationError> {
        collection_draft(form)
    }

    async fn create(&self, client: &PortalClient, draft: &CollectionDraft) -> Option<Value> {
        client.create_collection(draft).await
    }
}

/// The signed-in visitor's own check-ins. Anonymous visitors are sent to
/// the login page and the list shows its error state.
pub struct FootprintList;

#[async_trait]
impl ListResource for FootprintList {
    type Record = Footprint;
    type Draft = FootprintDraft;

    const INDICATOR: &'static str = "footprint-list";
    const EMPTY_MESSAGE: &'static str = "You have not checked in anywhere yet";
    const ERROR_MESSAGE: &'static str = "Could not load your footprints, please try again later";

    async fn fetch(
        &self,
        client: &PortalClient,
        scope: IndicatorScope,
    ) -> Option<Vec<Footprint>> {
        client.my_footprints_in(scope).await
    }

    fn row(&self, footprint: &Footprint) -> ListRow {
        let title = footprint
            .check_in_name
            .clone()
            .unwrap_or_else(|| format!("Check-in #{}", footprint.check_in_id));
        let detail = match (&footprint.create_time, &footprint.note) {
            (Some(at), Some(note)) => format!("{} {note}", at.format(TIME_FORMAT)),
            (Some(at), None) => at.format(TIME_FORMAT).to_string(),
            (None, note) => note.clone().unwrap_or_default(),
        };
        ListRow {
            id: footprint.id.0,
            title,
            detail,
        }
    }

    fn draft(&self, form: &FormData) -> Result<FootprintDraft, ValidationError> {
        footprint_draft(form)
    }

    async fn create(&self, client: &PortalClient, draft: &FootprintDraft) -> Option<Value> {
        client.add_footprint(draft).await
    }
}
