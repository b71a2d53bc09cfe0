use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{CheckInId, CollectionId, FootprintId, OrderId, StoryId, UserId},
    error::{require_text, ValidationError},
};

mod backend_time {
    use chrono::NaiveDateTime;
    use serde::{de::Error as _, Deserialize, Deserializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unrecognized timestamp '{raw}'")))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Update bodies carry the record id next to the draft fields.
#[derive(Debug, Serialize)]
pub struct Identified<'a, I, T> {
    pub id: I,
    #[serde(flatten)]
    pub body: &'a T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub recommend_reason: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "backend_time::deserialize")]
    pub create_time: Option<NaiveDateTime>,
}

/// Story form contents. The form calls the recommendation text `reason`; the
/// backend field is `recommendReason`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryDraft {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub reason: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<StoryId>,
    pub title: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommend_reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
}

impl StoryDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }

    /// Create body: `location` is always sent, empty.
    pub fn create_request(&self) -> StoryRequest<'_> {
        StoryRequest {
            location: Some(""),
            ..self.request(None)
        }
    }

    pub fn update_request(&self, id: StoryId) -> StoryRequest<'_> {
        self.request(Some(id))
    }

    fn request(&self, id: Option<StoryId>) -> StoryRequest<'_> {
        StoryRequest {
            id,
            title: self.title.trim(),
            content: self.content.trim(),
            author: non_blank(&self.author),
            category: non_blank(&self.category),
            recommend_reason: non_blank(&self.reason),
            location: None,
            image_url: non_blank(&self.image_url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: CheckInId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "backend_time::deserialize")]
    pub create_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInDraft {
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl CheckInDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("location", &self.location)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDraft {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CollectionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::invalid("price", "must be a non-negative number"));
        }
        if matches!(self.stock, Some(stock) if stock < 0) {
            return Err(ValidationError::invalid("stock", "must not be negative"));
        }
        Ok(())
    }
}

/// A visitor's personal check-in record ("footprint").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footprint {
    pub id: FootprintId,
    pub check_in_id: CheckInId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub check_in_name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "backend_time::deserialize")]
    pub create_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintDraft {
    pub check_in_id: CheckInId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionOrder {
    pub id: OrderId,
    pub collection_id: CollectionId,
    pub quantity: i64,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default, deserialize_with = "backend_time::deserialize")]
    pub create_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub collection_id: CollectionId,
    pub quantity: i64,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity < 1 {
            return Err(ValidationError::invalid("quantity", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub current: i64,
    #[serde(default)]
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageQuery {
    pub current: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            current: 1,
            size: 10,
            keyword: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("username", &self.username)?;
        require_text("password", &self.password)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn story_create_request_remaps_reason_and_injects_location() {
        let draft = StoryDraft {
            title: " Bronze bells ".into(),
            content: "Zeng Hou Yi".into(),
            reason: Some("must see".into()),
            author: Some("  ".into()),
            ..StoryDraft::default()
        };
        let body = serde_json::to_value(draft.create_request()).expect("serialize");
        assert_eq!(
            body,
            json!({
                "title": "Bronze bells",
                "content": "Zeng Hou Yi",
                "recommendReason": "must see",
                "location": ""
            })
        );
    }

    #[test]
    fn story_update_request_carries_id_without_location() {
        let draft = StoryDraft {
            title: "t".into(),
            content: "c".into(),
            ..StoryDraft::default()
        };
        let body = serde_json::to_value(draft.update_request(StoryId(4))).expect("serialize");
        assert_eq!(body, json!({ "id": 4, "title": "t", "content": "c" }));
    }

    #[test]
    fn identified_flattens_draft_fields() {
        let draft = CheckInDraft {
            name: "Gate".into(),
            location: "Xi'an".into(),
            ..CheckInDraft::default()
        };
        let body = serde_json::to_value(Identified {
            id: CheckInId(9),
            body: &draft,
        })
        .expect("serialize");
        assert_eq!(body, json!({ "id": 9, "name": "Gate", "location": "Xi'an" }));
    }

    #[test]
    fn drafts_report_first_missing_field() {
        assert_eq!(
            StoryDraft::default().validate(),
            Err(ValidationError::missing("title"))
        );
        let draft = CheckInDraft {
            name: "Gate".into(),
            ..CheckInDraft::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::missing("location")));
        let draft = CollectionDraft {
            name: "Vase".into(),
            price: -1.0,
            ..CollectionDraft::default()
        };
        assert_eq!(draft.validate().map_err(|e| e.field()), Err("price"));
    }

    #[test]
    fn records_accept_both_backend_timestamp_styles() {
        let story: Story = serde_json::from_value(json!({
            "id": 1,
            "title": "t",
            "createTime": "2024-03-01 08:30:00"
        }))
        .expect("space separated");
        assert!(story.create_time.is_some());

        let footprint: Footprint = serde_json::from_value(json!({
            "id": 2,
            "checkInId": 3,
            "createTime": "2024-03-01T08:30:00.123"
        }))
        .expect("iso");
        assert!(footprint.create_time.is_some());
    }

    #[test]
    fn collection_numbers_default_to_zero() {
        let collection: Collection =
            serde_json::from_value(json!({ "id": 5, "name": "Jade" })).expect("collection");
        assert_eq!(collection.price, 0.0);
        assert_eq!(collection.stock, 0);
    }
}
