use std::{
    collections::BTreeMap,
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
};

use shared::error::ValidationError;
use tokio::sync::Mutex;

/// Trimmed field values read from a form at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: BTreeMap<String, String>,
}

impl FormData {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.as_ref().trim().to_string()))
                .collect(),
        }
    }

    /// Field value, empty when the field is absent.
    pub fn text(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn optional(&self, field: &str) -> Option<String> {
        Some(self.text(field))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn number<T: FromStr>(&self, field: &'static str) -> Result<Option<T>, ValidationError> {
        let raw = self.text(field);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse()
            .map(Some)
            .map_err(|_| ValidationError::invalid(field, format!("'{raw}' is not a number")))
    }

    pub fn required_number<T: FromStr>(&self, field: &'static str) -> Result<T, ValidationError> {
        self.number(field)?
            .ok_or_else(|| ValidationError::missing(field))
    }
}

/// A create form on the page.
///
/// The submit handler is attached at most once no matter how often the page
/// initializes; the `bound` marker records that it is already attached.
#[derive(Debug, Default)]
pub struct FormSlot {
    fields: Mutex<BTreeMap<String, String>>,
    bound: AtomicBool,
}

impl FormSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, field: &str, value: impl Into<String>) {
        self.fields
            .lock()
            .await
            .insert(field.to_string(), value.into());
    }

    pub async fn read(&self) -> FormData {
        FormData::from_pairs(self.fields.lock().await.clone())
    }

    pub async fn reset(&self) {
        self.fields.lock().await.clear();
    }

    /// Attaches the submit handler unless one is already attached. Returns
    /// whether this call attached it.
    pub fn bind(&self) -> bool {
        self.bound
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }
}
