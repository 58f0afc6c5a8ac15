use crate::domain::model::Phase;
use thiserror::Error;

/// Fallback used when the provider rejects a call without a `message` field.
pub const GENERIC_GATEWAY_MESSAGE: &str = "gateway error";

pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service unavailable. Please try again later.";
const PLANS_FALLBACK_MESSAGE: &str = "Failed to fetch data plans. Please try again.";
const PURCHASE_FALLBACK_MESSAGE: &str = "Failed to complete purchase. Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Billing gateway unreachable: {message}")]
    Unreachable { message: String },

    /// `from_provider` is set only when `message` is the provider's own text.
    #[error("Billing gateway rejected the request ({status}): {message}")]
    UpstreamRejected {
        status: u16,
        message: String,
        from_provider: bool,
    },

    #[error("Billing gateway credentials are not configured")]
    MisconfiguredCredentials,
}

impl GatewayError {
    /// Rejection explained by the provider's `message` field.
    pub fn provider_rejected(status: u16, message: impl Into<String>) -> Self {
        GatewayError::UpstreamRejected {
            status,
            message: message.into(),
            from_provider: true,
        }
    }

    /// Rejection described locally: no provider message, or a body that could not be used.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        GatewayError::UpstreamRejected {
            status,
            message: message.into(),
            from_provider: false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::UpstreamRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Provider messages are shown as-is; locally built detail collapses to `fallback`.
    fn user_message_or(&self, fallback: &str) -> String {
        match self {
            GatewayError::UpstreamRejected {
                message,
                from_provider: true,
                ..
            } => message.clone(),
            GatewayError::MisconfiguredCredentials => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("No data plans available")]
    Empty,

    #[error("Failed to fetch data plans: {0}")]
    Upstream(#[from] GatewayError),
}

impl CatalogError {
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Empty => "No data plans available".to_string(),
            CatalogError::Upstream(e) => e.user_message_or(PLANS_FALLBACK_MESSAGE),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Failed to submit purchase: {0}")]
    Upstream(#[from] GatewayError),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Upstream(e) => e.user_message_or(PURCHASE_FALLBACK_MESSAGE),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Phone number must be exactly 11 digits")]
    InvalidPhone,

    #[error("Unsupported network: {0:?}")]
    InvalidNetwork(String),

    #[error("Data plan {0:?} is not in the current catalog")]
    UnknownPlan(String),
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::InvalidPhone => "Phone number must be 11 digits".to_string(),
            ValidationError::InvalidNetwork(_) => "Please choose a supported network".to_string(),
            ValidationError::UnknownPlan(_) => "Please choose a data plan from the list".to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A purchase is already being submitted")]
    Busy,

    #[error("Cannot {action} while {phase}")]
    InvalidPhase { action: &'static str, phase: Phase },
}

#[derive(Error, Debug)]
pub enum VtuError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Upstream,
    Configuration,
    Flow,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VtuError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VtuError::Validation(_) => ErrorCategory::Input,
            VtuError::Transition(_) => ErrorCategory::Flow,
            VtuError::Gateway(GatewayError::MisconfiguredCredentials)
            | VtuError::Catalog(CatalogError::Upstream(GatewayError::MisconfiguredCredentials))
            | VtuError::Submit(SubmitError::Upstream(GatewayError::MisconfiguredCredentials))
            | VtuError::ConfigError { .. }
            | VtuError::MissingConfigError { .. }
            | VtuError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            VtuError::Gateway(_) | VtuError::Catalog(_) | VtuError::Submit(_) => {
                ErrorCategory::Upstream
            }
            VtuError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Reportable, not fatal.
            VtuError::Catalog(CatalogError::Empty) => ErrorSeverity::Low,
            _ => match self.category() {
                ErrorCategory::Upstream => ErrorSeverity::Medium,
                ErrorCategory::Input | ErrorCategory::Flow => ErrorSeverity::High,
                ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
            },
        }
    }

    /// Message safe to show an end user. Never carries credentials or internals.
    pub fn user_message(&self) -> String {
        match self {
            VtuError::Gateway(e) => e.user_message_or(SERVICE_UNAVAILABLE_MESSAGE),
            VtuError::Catalog(e) => e.user_message(),
            VtuError::Submit(e) => e.user_message(),
            VtuError::Validation(e) => e.user_message(),
            VtuError::Transition(TransitionError::Busy) => {
                "Your purchase is still being processed".to_string()
            }
            VtuError::Transition(_) => "That action is not available right now".to_string(),
            VtuError::ConfigError { .. }
            | VtuError::MissingConfigError { .. }
            | VtuError::InvalidConfigValueError { .. }
            | VtuError::IoError(_) => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the phone number, network and plan, then try again",
            ErrorCategory::Flow => "Wait for the current step to finish before starting another",
            ErrorCategory::Upstream => "The billing provider could not complete the request; try again shortly",
            ErrorCategory::Configuration => {
                "Set VTU_API_BASE_URL, VTU_API_USERNAME and VTU_API_PASSWORD (or provide --config)"
            }
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, VtuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misconfigured_credentials_never_leak() {
        let err = VtuError::from(SubmitError::Upstream(GatewayError::MisconfiguredCredentials));
        assert_eq!(err.user_message(), SERVICE_UNAVAILABLE_MESSAGE);
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_provider_message_is_surfaced() {
        let err = CatalogError::Upstream(GatewayError::provider_rejected(400, "Invalid network"));
        assert_eq!(err.user_message(), "Invalid network");

        let generic = SubmitError::Upstream(GatewayError::rejected(502, GENERIC_GATEWAY_MESSAGE));
        assert_eq!(generic.user_message(), PURCHASE_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_decode_detail_is_not_shown() {
        let shape = GatewayError::rejected(200, "unexpected response shape: missing field `amount`");

        assert_eq!(
            CatalogError::Upstream(shape.clone()).user_message(),
            PLANS_FALLBACK_MESSAGE
        );
        assert_eq!(
            VtuError::from(CatalogError::Upstream(shape.clone())).user_message(),
            PLANS_FALLBACK_MESSAGE
        );
        assert_eq!(
            SubmitError::Upstream(GatewayError::rejected(200, "malformed response body")).user_message(),
            PURCHASE_FALLBACK_MESSAGE
        );
        assert_eq!(VtuError::from(shape).user_message(), SERVICE_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_unreachable_uses_fallbacks() {
        let gateway = GatewayError::Unreachable {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            CatalogError::Upstream(gateway.clone()).user_message(),
            PLANS_FALLBACK_MESSAGE
        );
        assert_eq!(SubmitError::Upstream(gateway).user_message(), PURCHASE_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(VtuError::from(CatalogError::Empty).severity(), ErrorSeverity::Low);
        assert_eq!(
            VtuError::from(ValidationError::InvalidPhone).severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            VtuError::from(GatewayError::Unreachable {
                message: "timeout".to_string()
            })
            .severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            VtuError::MissingConfigError {
                field: "username".to_string()
            }
            .severity(),
            ErrorSeverity::Critical
        );
    }
}
