use serde_json::Value;
use shared::{
    domain::FootprintId,
    protocol::{Footprint, FootprintDraft},
};

use crate::{indicator::IndicatorScope, transport::HttpMethod, PortalClient};

pub const FOOTPRINT_PATH: &str = "/user-check-in";

impl PortalClient {
    pub async fn my_footprints(&self) -> Option<Vec<Footprint>> {
        self.my_footprints_in(IndicatorScope::Page).await
    }

    pub(crate) async fn my_footprints_in(&self, scope: IndicatorScope) -> Option<Vec<Footprint>> {
        if !self.require_login() {
            return None;
        }
        self.fetch_list(scope, &format!("{FOOTPRINT_PATH}/my"))
            .await
    }

    pub async fn add_footprint(&self, draft: &FootprintDraft) -> Option<Value> {
        if !self.require_login() {
            return None;
        }
        self.transport()
            .call(HttpMethod::Post, FOOTPRINT_PATH, draft)
            .await
    }

    pub async fn delete_footprint(&self, id: FootprintId) -> Option<Value> {
        if !self.require_login() {
            return None;
        }
        self.transport()
            .call(HttpMethod::Delete, &format!("{FOOTPRINT_PATH}/{id}"), &())
            .await
    }
}
