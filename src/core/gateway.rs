use crate::domain::ports::{BillingGateway, ConfigProvider, Credentials, DataList};
use crate::utils::error::{GatewayError, GENERIC_GATEWAY_MESSAGE};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// reqwest-backed client for the billing provider.
///
/// Every call carries HTTP Basic credentials from configuration. Calls are
/// issued exactly once; there is no retry at this layer.
#[derive(Clone)]
pub struct HttpBillingGateway {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
}

impl HttpBillingGateway {
    pub fn new<C: ConfigProvider>(config: &C) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client<C: ConfigProvider>(client: Client, config: &C) -> Self {
        if config.credentials().is_none() {
            tracing::warn!("⚠️ Billing gateway created without credentials; every call will fail");
        }

        Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            credentials: config.credentials(),
            timeout: config.timeout(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, Value), GatewayError> {
        let Some(credentials) = &self.credentials else {
            tracing::error!(path, "❌ Billing gateway credentials missing, request not sent");
            return Err(GatewayError::MisconfiguredCredentials);
        };

        // Query values include the subscriber's phone number, so only keys are logged.
        let keys: Vec<&str> = query.iter().map(|(key, _)| *key).collect();
        tracing::debug!("📡 GET {} {:?}", self.endpoint(path), keys);

        let mut request = self
            .client
            .get(self.endpoint(path))
            .basic_auth(&credentials.username, Some(&credentials.password))
            .query(query);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| unreachable(path, e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| unreachable(path, e))?;

        tracing::debug!("📡 {} responded with {}", path, status);

        if !status.is_success() {
            let err = match provider_message(&body) {
                Some(message) => GatewayError::provider_rejected(status.as_u16(), message),
                None => GatewayError::rejected(status.as_u16(), GENERIC_GATEWAY_MESSAGE),
            };
            return Err(rejected(path, err));
        }

        let json = serde_json::from_slice(&body)
            .map_err(|_| rejected(path, GatewayError::rejected(status.as_u16(), "malformed response body")))?;

        Ok((status, json))
    }
}

#[async_trait]
impl BillingGateway for HttpBillingGateway {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, GatewayError> {
        let (_, body) = self.send(path, query).await?;
        Ok(body)
    }

    async fn get_data_list(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<DataList, GatewayError> {
        let (status, body) = self.send(path, query).await?;
        let status = status.as_u16();

        extract_data_list(body)
            .map(|items| DataList { status, items })
            .ok_or_else(|| rejected(path, GatewayError::rejected(status, "unexpected response shape")))
    }
}

/// Accepts `{data: [...]}`, `{data: {data: [...]}}` or a bare array. Anything else is refused.
fn extract_data_list(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut envelope) => match envelope.remove("data")? {
            Value::Array(items) => Some(items),
            Value::Object(mut inner) => match inner.remove("data")? {
                Value::Array(items) => Some(items),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

fn provider_message(body: &[u8]) -> Option<String> {
    let json: Value = serde_json::from_slice(body).ok()?;
    json.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn unreachable(path: &str, err: reqwest::Error) -> GatewayError {
    // Strip the URL: its query string holds the phone number.
    let message = err.without_url().to_string();
    tracing::warn!(path, %message, "⚠️ Billing gateway unreachable");
    GatewayError::Unreachable { message }
}

fn rejected(path: &str, err: GatewayError) -> GatewayError {
    if let GatewayError::UpstreamRejected { status, message, .. } = &err {
        tracing::warn!(path, status, %message, "⚠️ Billing gateway rejected request");
    }
    err
}
