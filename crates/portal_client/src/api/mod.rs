//! Resource operations. Each returns `None` on any failure; the transport has
//! already told the visitor what went wrong.

use serde::de::DeserializeOwned;
use shared::error::ValidationError;

use crate::{
    error::CallFailure,
    indicator::IndicatorScope,
    transport::HttpMethod,
    PortalClient,
};

pub mod check_ins;
pub mod collections;
pub mod footprints;
pub mod orders;
pub mod stories;
pub mod users;

impl PortalClient {
    /// Shows a failed local check to the visitor.
    pub(crate) fn validated<T>(&self, check: Result<T, ValidationError>) -> Result<T, CallFailure> {
        check.map_err(|err| {
            self.notifier().inform(&err.to_string());
            CallFailure::Invalid(err)
        })
    }

    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        scope: IndicatorScope,
        path: &str,
    ) -> Option<Vec<T>> {
        self.transport()
            .call_in(scope, HttpMethod::Get, path, &())
            .await
    }
}

#[cfg(test)]
#[path = "../tests/api_tests.rs"]
mod tests;
