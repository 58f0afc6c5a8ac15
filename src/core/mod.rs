pub mod catalog;
pub mod flow;
pub mod gateway;
pub mod purchase;
pub mod validator;

pub use crate::domain::model::{Catalog, DataPlan, Network, Phase, PurchaseOutcome, PurchaseRequest};
pub use crate::domain::ports::{BillingGateway, ConfigProvider, DataList};
pub use crate::utils::error::Result;
