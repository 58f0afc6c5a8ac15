pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use config::{toml_config::TomlConfig, GatewayConfig};
pub use core::{
    catalog::PlanCatalog,
    flow::{FlowState, PlanLoad, PlanTicket, PurchaseFlow},
    gateway::HttpBillingGateway,
    purchase::PurchaseSubmitter,
    validator::validate,
};
pub use domain::model::{Catalog, DataPlan, Network, Phase, PurchaseOutcome, PurchaseRequest};
pub use domain::ports::{BillingGateway, ConfigProvider, Credentials};
pub use utils::error::{
    CatalogError, GatewayError, Result, SubmitError, TransitionError, ValidationError, VtuError,
};
