use crate::domain::model::{Catalog, DataPlan, Network};
use crate::domain::ports::{BillingGateway, DATA_PATH};
use crate::utils::error::CatalogError;

/// Resolves the plans on sale for a network. Never cached: prices are provider-authoritative.
pub struct PlanCatalog<G: BillingGateway> {
    gateway: G,
}

impl<G: BillingGateway> PlanCatalog<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn resolve(&self, network: Network) -> Result<Catalog, CatalogError> {
        tracing::debug!("📂 Resolving data plans for {}", network);

        let list = self
            .gateway
            .get_data_list(DATA_PATH, &[("network_id", network.as_str().to_string())])
            .await?;

        if list.is_empty() {
            tracing::info!("📂 No data plans available for {}", network);
            return Err(CatalogError::Empty);
        }

        let plans: Vec<DataPlan> = list.decode()?;
        tracing::info!("📂 Resolved {} data plans for {}", plans.len(), network);

        Ok(Catalog::new(network, plans))
    }
}
