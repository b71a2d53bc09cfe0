use serde_json::Value;
use shared::protocol::{CollectionOrder, OrderRequest};

use crate::{transport::HttpMethod, PortalClient};

pub const ORDER_PATH: &str = "/collection-order";

impl PortalClient {
    /// Purchases a collection item. Requires a signed-in visitor.
    pub async fn buy_collection(&self, request: &OrderRequest) -> Option<Value> {
        if !self.require_login() {
            return None;
        }
        self.validated(request.validate()).ok()?;
        self.transport()
            .call(HttpMethod::Post, ORDER_PATH, request)
            .await
    }

    pub async fn my_orders(&self) -> Option<Vec<CollectionOrder>> {
        if !self.require_login() {
            return None;
        }
        self.transport()
            .call(HttpMethod::Get, &format!("{ORDER_PATH}/my"), &())
            .await
    }
}
