use crate::utils::error::GatewayError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Endpoint the provider overloads for both plan lookup and purchase.
pub const DATA_PATH: &str = "/data";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    /// `None` when either half is missing or blank.
    fn credentials(&self) -> Option<Credentials>;
    fn timeout(&self) -> Option<Duration>;
}

/// List payload unwrapped from a provider envelope, with the status it arrived under.
#[derive(Debug, Clone, PartialEq)]
pub struct DataList {
    pub status: u16,
    pub items: Vec<Value>,
}

impl DataList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All-or-nothing: one malformed element rejects the whole list.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Vec<T>, GatewayError> {
        let status = self.status;
        self.items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| {
                let message = format!("unexpected response shape: {}", e);
                tracing::warn!(status, %message, "⚠️ Billing gateway returned an undecodable list");
                GatewayError::rejected(status, message)
            })
    }
}

#[async_trait]
pub trait BillingGateway: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, GatewayError>;

    async fn get_data_list(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<DataList, GatewayError>;
}

#[async_trait]
impl<G: BillingGateway + ?Sized> BillingGateway for Arc<G> {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, GatewayError> {
        (**self).get(path, query).await
    }

    async fn get_data_list(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<DataList, GatewayError> {
        (**self).get_data_list(path, query).await
    }
}
