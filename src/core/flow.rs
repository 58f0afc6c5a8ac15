use crate::core::catalog::PlanCatalog;
use crate::core::purchase::PurchaseSubmitter;
use crate::core::validator;
use crate::domain::model::{Catalog, Network, Phase, PurchaseOutcome, PurchaseRequest};
use crate::domain::ports::BillingGateway;
use crate::utils::error::{
    CatalogError, GatewayError, Result, TransitionError, ValidationError, VtuError,
};
use tokio::sync::Mutex;

/// Where a purchase session currently stands. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    LoadingPlans { network: Network },
    PlansReady { catalog: Catalog },
    PlanLoadFailed { network: Network, reason: CatalogError },
    Submitting { request: PurchaseRequest },
    Completed { outcome: PurchaseOutcome },
}

impl FlowState {
    pub fn phase(&self) -> Phase {
        match self {
            FlowState::Idle => Phase::Idle,
            FlowState::LoadingPlans { .. } => Phase::LoadingPlans,
            FlowState::PlansReady { .. } => Phase::PlansReady,
            FlowState::PlanLoadFailed { .. } => Phase::PlanLoadFailed,
            FlowState::Submitting { .. } => Phase::Submitting,
            FlowState::Completed { .. } => Phase::Completed,
        }
    }

    pub fn network(&self) -> Option<Network> {
        match self {
            FlowState::LoadingPlans { network } | FlowState::PlanLoadFailed { network, .. } => {
                Some(*network)
            }
            FlowState::PlansReady { catalog } => Some(catalog.network()),
            FlowState::Submitting { request } => Some(request.network()),
            FlowState::Idle | FlowState::Completed { .. } => None,
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            FlowState::PlansReady { catalog } => Some(catalog),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&PurchaseOutcome> {
        match self {
            FlowState::Completed { outcome } => Some(outcome),
            _ => None,
        }
    }
}

/// Handle for an outstanding catalog fetch, captured when the network was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTicket {
    network: Network,
    selection: u64,
}

impl PlanTicket {
    pub fn network(&self) -> Network {
        self.network
    }
}

/// What a catalog fetch did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanLoad {
    Ready(Catalog),
    Failed(CatalogError),
    /// A newer selection was made while this fetch was outstanding; its result was dropped.
    Superseded,
}

struct Session {
    state: FlowState,
    selection: u64,
}

/// Sequences network selection, plan lookup, validation and submission for one user session.
///
/// All methods take `&self`; the session lock is never held across an upstream call,
/// so a caller can keep reading [`PurchaseFlow::state`] while a fetch or submission
/// is outstanding.
pub struct PurchaseFlow<G: BillingGateway> {
    catalog: PlanCatalog<G>,
    submitter: PurchaseSubmitter<G>,
    session: Mutex<Session>,
}

impl<G: BillingGateway + Clone> PurchaseFlow<G> {
    pub fn new(gateway: G) -> Self {
        Self::from_parts(
            PlanCatalog::new(gateway.clone()),
            PurchaseSubmitter::new(gateway),
        )
    }
}

impl<G: BillingGateway> PurchaseFlow<G> {
    pub fn from_parts(catalog: PlanCatalog<G>, submitter: PurchaseSubmitter<G>) -> Self {
        Self {
            catalog,
            submitter,
            session: Mutex::new(Session {
                state: FlowState::Idle,
                selection: 0,
            }),
        }
    }

    pub async fn state(&self) -> FlowState {
        self.session.lock().await.state.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.session.lock().await.state.phase()
    }

    /// Selects `network` and loads its plans. Any earlier plans and plan choice are discarded.
    pub async fn select_network(&self, network: Network) -> Result<PlanLoad> {
        let ticket = self.begin_plan_load(network).await?;
        let resolved = self.catalog.resolve(network).await;
        Ok(self.finish_plan_load(ticket, resolved).await)
    }

    /// First half of [`select_network`](Self::select_network), for callers that run the fetch themselves.
    pub async fn begin_plan_load(
        &self,
        network: Network,
    ) -> std::result::Result<PlanTicket, TransitionError> {
        let mut session = self.session.lock().await;

        match &session.state {
            FlowState::Submitting { .. } => return Err(TransitionError::Busy),
            FlowState::Completed { .. } => {
                return Err(TransitionError::InvalidPhase {
                    action: "select a network",
                    phase: Phase::Completed,
                })
            }
            FlowState::LoadingPlans { network: pending } => {
                tracing::debug!("🔄 Superseding plan fetch for {} with {}", pending, network);
            }
            _ => {}
        }

        session.selection += 1;
        session.state = FlowState::LoadingPlans { network };

        Ok(PlanTicket {
            network,
            selection: session.selection,
        })
    }

    /// Applies a fetch result, unless a newer selection has been made since `ticket` was issued.
    pub async fn finish_plan_load(
        &self,
        ticket: PlanTicket,
        resolved: std::result::Result<Catalog, CatalogError>,
    ) -> PlanLoad {
        let mut session = self.session.lock().await;

        let current = session.selection == ticket.selection
            && matches!(session.state, FlowState::LoadingPlans { network } if network == ticket.network);
        if !current {
            tracing::debug!("🗑️ Discarding stale plan response for {}", ticket.network);
            return PlanLoad::Superseded;
        }

        match resolved {
            Ok(catalog) if catalog.network() == ticket.network && !catalog.is_empty() => {
                session.state = FlowState::PlansReady {
                    catalog: catalog.clone(),
                };
                PlanLoad::Ready(catalog)
            }
            Ok(catalog) if catalog.network() != ticket.network => {
                tracing::warn!(
                    "⚠️ Catalog for {} delivered to a {} fetch, discarding",
                    catalog.network(),
                    ticket.network
                );
                let mismatch =
                    GatewayError::rejected(200, "unexpected response shape: catalog for another network");
                fail(&mut session, ticket.network, CatalogError::Upstream(mismatch))
            }
            Ok(_) => fail(&mut session, ticket.network, CatalogError::Empty),
            Err(reason) => fail(&mut session, ticket.network, reason),
        }
    }

    /// Validates input against the plans currently on offer. Does not change state.
    pub async fn validate_and_build_request(
        &self,
        phone: &str,
        plan_id: &str,
    ) -> Result<PurchaseRequest> {
        let session = self.session.lock().await;

        match &session.state {
            FlowState::Submitting { .. } => Err(TransitionError::Busy.into()),
            FlowState::PlansReady { catalog } => {
                validator::validate(phone, catalog.network().as_str(), plan_id, catalog).map_err(
                    |e| {
                        tracing::debug!("Purchase input rejected: {}", e);
                        VtuError::from(e)
                    },
                )
            }
            other => Err(TransitionError::InvalidPhase {
                action: "validate a purchase",
                phase: other.phase(),
            }
            .into()),
        }
    }

    /// Submits `request` once. A provider decline still completes the flow; a gateway
    /// failure returns the session to its plans so the user can try again.
    pub async fn submit(&self, request: PurchaseRequest) -> Result<PurchaseOutcome> {
        let catalog = {
            let mut session = self.session.lock().await;

            let catalog = match &session.state {
                FlowState::Submitting { .. } => return Err(TransitionError::Busy.into()),
                FlowState::PlansReady { catalog } => catalog.clone(),
                other => {
                    return Err(TransitionError::InvalidPhase {
                        action: "submit a purchase",
                        phase: other.phase(),
                    }
                    .into())
                }
            };

            if catalog.network() != request.network() || catalog.find(request.plan_id()).is_none() {
                return Err(ValidationError::UnknownPlan(request.plan_id().to_string()).into());
            }

            session.state = FlowState::Submitting {
                request: request.clone(),
            };
            catalog
        };

        let submitted = self.submitter.submit(&request).await;

        let mut session = self.session.lock().await;
        match submitted {
            Ok(outcome) => {
                session.state = FlowState::Completed {
                    outcome: outcome.clone(),
                };
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("⚠️ Purchase submission failed: {}", e);
                session.state = FlowState::PlansReady { catalog };
                Err(e.into())
            }
        }
    }

    /// Returns a completed session to `Idle`.
    pub async fn reset(&self) -> std::result::Result<(), TransitionError> {
        let mut session = self.session.lock().await;

        match &session.state {
            FlowState::Completed { .. } | FlowState::Idle => {
                session.state = FlowState::Idle;
                Ok(())
            }
            FlowState::Submitting { .. } => Err(TransitionError::Busy),
            other => Err(TransitionError::InvalidPhase {
                action: "reset",
                phase: other.phase(),
            }),
        }
    }
}

fn fail(session: &mut Session, network: Network, reason: CatalogError) -> PlanLoad {
    tracing::info!("📂 Plans unavailable for {}: {}", network, reason);
    session.state = FlowState::PlanLoadFailed {
        network,
        reason: reason.clone(),
    };
    PlanLoad::Failed(reason)
}
