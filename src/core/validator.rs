use crate::domain::model::{Catalog, Network, PurchaseRequest};
use crate::utils::error::ValidationError;

pub const PHONE_LENGTH: usize = 11;

/// Checks purchase input before any network call. First failure wins:
/// phone, then network, then plan (which must be in `catalog` for that network).
pub fn validate(
    phone: &str,
    network: &str,
    plan_id: &str,
    catalog: &Catalog,
) -> Result<PurchaseRequest, ValidationError> {
    validate_phone(phone)?;
    let network: Network = network.parse()?;

    let unknown = || ValidationError::UnknownPlan(plan_id.to_string());
    let id: u64 = plan_id.trim().parse().map_err(|_| unknown())?;

    // A catalog for another network is stale for this purchase.
    if catalog.network() != network || catalog.find(id).is_none() {
        return Err(unknown());
    }

    Ok(PurchaseRequest::new(phone.to_string(), network, id))
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == PHONE_LENGTH && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}
