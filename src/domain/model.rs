use crate::utils::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mobile carriers a bundle can be bought for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mtn,
    Glo,
    Airtel,
    Etisalat,
}

impl Network {
    pub const ALL: [Network; 4] = [Network::Mtn, Network::Glo, Network::Airtel, Network::Etisalat];

    /// Identifier sent to the provider as `network_id`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mtn => "mtn",
            Network::Glo => "glo",
            Network::Airtel => "airtel",
            Network::Etisalat => "etisalat",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Mtn => "MTN",
            Network::Glo => "Glo",
            Network::Airtel => "Airtel",
            Network::Etisalat => "9mobile",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidNetwork(s.to_string()))
    }
}

/// A purchasable data bundle as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPlan {
    #[serde(deserialize_with = "lenient::plan_id")]
    pub id: u64,
    #[serde(alias = "plan")]
    pub label: String,
    #[serde(deserialize_with = "lenient::amount")]
    pub amount: String,
    pub validity: String,
}

impl fmt::Display for DataPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - ₦{} ({})", self.label, self.amount, self.validity)
    }
}

/// Plans resolved for one network, in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    network: Network,
    plans: Vec<DataPlan>,
}

impl Catalog {
    pub fn new(network: Network, plans: Vec<DataPlan>) -> Self {
        Self { network, plans }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn plans(&self) -> &[DataPlan] {
        &self.plans
    }

    pub fn find(&self, plan_id: u64) -> Option<&DataPlan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// A validated purchase. Only `core::validator` can build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRequest {
    phone: String,
    network: Network,
    plan_id: u64,
}

impl PurchaseRequest {
    pub(crate) fn new(phone: String, network: Network, plan_id: u64) -> Self {
        Self {
            phone,
            network,
            plan_id,
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn plan_id(&self) -> u64 {
        self.plan_id
    }
}

/// Terminal result of a purchase attempt. `reference` and `amount` only exist on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOutcome {
    succeeded: bool,
    message: String,
    reference: Option<String>,
    amount: Option<String>,
}

impl PurchaseOutcome {
    pub fn success(message: impl Into<String>, reference: Option<String>, amount: Option<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
            reference,
            amount,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
            reference: None,
            amount: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    LoadingPlans,
    PlansReady,
    PlanLoadFailed,
    Submitting,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::LoadingPlans => "loading plans",
            Phase::PlansReady => "plans are ready",
            Phase::PlanLoadFailed => "plan loading failed",
            Phase::Submitting => "submitting",
            Phase::Completed => "completed",
        };
        f.write_str(label)
    }
}

// The provider is loose about scalar types: ids and amounts show up as numbers or strings.
mod lenient {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    pub fn plan_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| D::Error::custom(format!("invalid plan id: {}", n))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid plan id: {:?}", s))),
            other => Err(D::Error::custom(format!("invalid plan id: {}", other))),
        }
    }

    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s),
            other => Err(D::Error::custom(format!("invalid amount: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!("mtn".parse::<Network>().unwrap(), Network::Mtn);
        assert_eq!("Airtel".parse::<Network>().unwrap(), Network::Airtel);
        assert_eq!("etisalat".parse::<Network>().unwrap(), Network::Etisalat);
        assert_eq!(
            "vodafone".parse::<Network>(),
            Err(ValidationError::InvalidNetwork("vodafone".to_string()))
        );
        assert!("".parse::<Network>().is_err());
    }

    #[test]
    fn test_network_display_names() {
        let names: Vec<_> = Network::ALL.iter().map(Network::display_name).collect();
        assert_eq!(names, vec!["MTN", "Glo", "Airtel", "9mobile"]);
    }

    #[test]
    fn test_data_plan_accepts_provider_field_names() {
        let plan: DataPlan = serde_json::from_value(serde_json::json!({
            "id": 7,
            "plan": "1GB/30days",
            "amount": "500",
            "validity": "30 days"
        }))
        .unwrap();
        assert_eq!(plan.id, 7);
        assert_eq!(plan.label, "1GB/30days");
        assert_eq!(plan.to_string(), "1GB/30days - ₦500 (30 days)");
    }

    #[test]
    fn test_data_plan_lenient_scalars() {
        let plan: DataPlan = serde_json::from_value(serde_json::json!({
            "id": "12",
            "label": "2GB",
            "amount": 1000,
            "validity": "30 days"
        }))
        .unwrap();
        assert_eq!(plan.id, 12);
        assert_eq!(plan.amount, "1000");

        let bad = serde_json::from_value::<DataPlan>(serde_json::json!({
            "id": -1,
            "label": "2GB",
            "amount": "1000",
            "validity": "30 days"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_outcome_failure_has_no_reference() {
        let outcome = PurchaseOutcome::failure("Insufficient balance");
        assert!(!outcome.succeeded());
        assert_eq!(outcome.reference(), None);
        assert_eq!(outcome.amount(), None);
    }
}
