use crate::domain::model::{PurchaseOutcome, PurchaseRequest};
use crate::domain::ports::{BillingGateway, DATA_PATH};
use crate::utils::error::SubmitError;
use serde_json::Value;

const SUCCESS_STATUS: &str = "success";

/// Sends a validated purchase to the provider, at most once per call.
pub struct PurchaseSubmitter<G: BillingGateway> {
    gateway: G,
}

impl<G: BillingGateway> PurchaseSubmitter<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn submit(&self, request: &PurchaseRequest) -> Result<PurchaseOutcome, SubmitError> {
        tracing::info!(
            "🛒 Submitting purchase: network={}, plan_id={}",
            request.network(),
            request.plan_id()
        );

        let query = [
            ("phone", request.phone().to_string()),
            ("network_id", request.network().as_str().to_string()),
            ("plan_id", request.plan_id().to_string()),
        ];
        let body = self.gateway.get(DATA_PATH, &query).await?;

        let outcome = normalize_outcome(&body);
        if outcome.succeeded() {
            tracing::info!("✅ Purchase succeeded, reference={:?}", outcome.reference());
        } else {
            tracing::info!("❌ Purchase declined by provider: {}", outcome.message());
        }

        Ok(outcome)
    }
}

/// Maps a 2xx purchase body onto an outcome. Anything but `status == "success"` is a decline.
fn normalize_outcome(body: &Value) -> PurchaseOutcome {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty());

    if body.get("status").and_then(Value::as_str) == Some(SUCCESS_STATUS) {
        let data = body.get("data");
        PurchaseOutcome::success(
            message.unwrap_or("Purchase successful"),
            data.and_then(|d| scalar(d.get("reference"))),
            data.and_then(|d| scalar(d.get("amount"))),
        )
    } else {
        PurchaseOutcome::failure(message.unwrap_or("Purchase failed"))
    }
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
