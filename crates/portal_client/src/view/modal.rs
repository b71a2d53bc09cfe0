//! Edit dialogs filled from a single record fetched on demand.

use std::{collections::BTreeMap, fmt, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::{CheckInId, CollectionId, StoryId},
    protocol::{CheckIn, Collection, Story},
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    error::CallFailure,
    view::{
        form::FormData,
        pages::{check_in_draft, collection_draft, story_draft},
    },
    PortalClient,
};

pub const LOAD_FAILED_NOTICE: &str = "Failed to load record";

#[async_trait]
pub trait DialogRecord: Send + Sync + 'static {
    type Id: Copy + fmt::Display + Send + Sync + 'static;
    type Record: Send;

    async fn load(&self, client: &PortalClient, id: Self::Id)
        -> Result<Self::Record, CallFailure>;

    /// Every dialog field with its value; absent text is `""`, absent
    /// numbers are `0`.
    fn fields(&self, record: &Self::Record) -> Vec<(&'static str, String)>;

    async fn save(
        &self,
        client: &PortalClient,
        id: Self::Id,
        form: &FormData,
    ) -> Result<Value, CallFailure>;
}

#[derive(Debug)]
struct DialogState<I> {
    visible: bool,
    editing: Option<I>,
    fields: BTreeMap<&'static str, String>,
}

pub struct EditDialog<D: DialogRecord> {
    client: Arc<PortalClient>,
    kind: D,
    state: Mutex<DialogState<D::Id>>,
}

impl<D: DialogRecord> EditDialog<D> {
    pub fn new(client: Arc<PortalClient>, kind: D) -> Arc<Self> {
        Arc::new(Self {
            client,
            kind,
            state: Mutex::new(DialogState {
                visible: false,
                editing: None,
                fields: BTreeMap::new(),
            }),
        })
    }

    /// Starts loading `id` in the background; the dialog appears once the
    /// record has arrived.
    pub fn open(self: &Arc<Self>, id: D::Id) -> JoinHandle<bool> {
        let dialog = Arc::clone(self);
        tokio::spawn(async move { dialog.load(id).await })
    }

    pub async fn load(&self, id: D::Id) -> bool {
        match self.kind.load(&self.client, id).await {
            Ok(record) => {
                let fields = self.kind.fields(&record);
                let mut guard = self.state.lock().await;
                guard.fields.extend(fields);
                guard.editing = Some(id);
                guard.visible = true;
                true
            }
            Err(err) => {
                warn!(%id, error = %err, "dialog record unavailable");
                self.client
                    .notifier()
                    .alert(&format!("{LOAD_FAILED_NOTICE}: {err}"));
                false
            }
        }
    }

    /// Hides the dialog. Field values stay until the next `open`.
    pub async fn close(&self) {
        self.state.lock().await.visible = false;
    }

    pub async fn is_visible(&self) -> bool {
        self.state.lock().await.visible
    }

    pub async fn editing(&self) -> Option<D::Id> {
        self.state.lock().await.editing
    }

    pub async fn field(&self, name: &str) -> Option<String> {
        self.state.lock().await.fields.get(name).cloned()
    }

    pub async fn set_field(&self, name: &'static str, value: impl Into<String>) {
        self.state.lock().await.fields.insert(name, value.into());
    }

    /// Sends the edited fields and closes the dialog on success.
    pub async fn save(&self) -> bool {
        let (id, form) = {
            let guard = self.state.lock().await;
            let Some(id) = guard.editing.filter(|_| guard.visible) else {
                return false;
            };
            (id, FormData::from_pairs(guard.fields.clone()))
        };

        match self.kind.save(&self.client, id, &form).await {
            Ok(_) => {
                self.close().await;
                true
            }
            Err(err) => {
                debug!(%id, error = %err, "dialog save failed");
                false
            }
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<f64>) -> String {
    value.unwrap_or(0.0).to_string()
}

pub struct StoryDialog;

#[async_trait]
impl DialogRecord for StoryDialog {
    type Id = StoryId;
    type Record = Story;

    async fn load(&self, client: &PortalClient, id: StoryId) -> Result<Story, CallFailure> {
        client.try_story(id).await
    }

    fn fields(&self, story: &Story) -> Vec<(&'static str, String)> {
        vec![
            ("title", story.title.clone()),
            ("content", text(&story.content)),
            ("author", text(&story.author)),
            ("category", text(&story.category)),
            ("reason", text(&story.recommend_reason)),
            ("imageUrl", text(&story.image_url)),
        ]
    }

    async fn save(
        &self,
        client: &PortalClient,
        id: StoryId,
        form: &FormData,
    ) -> Result<Value, CallFailure> {
        let draft = client.validated(story_draft(form))?;
        client.try_update_story(id, &draft).await
    }
}

pub struct CheckInDialog;

#[async_trait]
impl DialogRecord for CheckInDialog {
    type Id = CheckInId;
    type Record = CheckIn;

    async fn load(&self, client: &PortalClient, id: CheckInId) -> Result<CheckIn, CallFailure> {
        client.try_check_in(id).await
    }

    fn fields(&self, check_in: &CheckIn) -> Vec<(&'static str, String)> {
        vec![
            ("name", check_in.name.clone()),
            ("location", text(&check_in.location)),
            ("description", text(&check_in.description)),
            ("imageUrl", text(&check_in.image_url)),
            ("latitude", number(check_in.latitude)),
            ("longitude", number(check_in.longitude)),
        ]
    }

    async fn save(
        &self,
        client: &PortalClient,
        id: CheckInId,
        form: &FormData,
    ) -> Result<Value, CallFailure> {
        let draft = client.validated(check_in_draft(form))?;
        client.try_update_check_in(id, &draft).await
    }
}

pub struct CollectionDialog;

#[async_trait]
impl DialogRecord for CollectionDialog {
    type Id = CollectionId;
    type Record = Collection;

    async fn load(
        &self,
        client: &PortalClient,
        id: CollectionId,
    ) -> Result<Collection, CallFailure> {
        client.try_collection(id).await
    }

    fn fields(&self, collection: &Collection) -> Vec<(&'static str, String)> {
        vec![
            ("name", collection.name.clone()),
            ("description", text(&collection.description)),
            ("price", collection.price.to_string()),
            ("stock", collection.stock.to_string()),
            ("imageUrl", text(&collection.image_url)),
            ("category", text(&collection.category)),
        ]
    }

    async fn save(
        &self,
        client: &PortalClient,
        id: CollectionId,
        form: &FormData,
    ) -> Result<Value, CallFailure> {
        let draft = client.validated(collection_draft(form))?;
        client.try_update_collection(id, &draft).await
    }
}

#[cfg(test)]
#[path = "../tests/modal_tests.rs"]
mod tests;
