//! Peer process assembly.

use crate::{
    bootstrap, Buyer, PeerConfig, PeerError, RequestCoordinator, ReservationLedger, Result, Role,
    Seller, SequenceTracker, TradeLog,
};
use std::sync::Arc;

/// Joins the overlay and runs one peer to completion.
///
/// Each peer owns exactly one sequence tracker plus its role's monitor,
/// constructed here and handed to the role. `role` of `None` flips a
/// coin. A full registry is a clean exit, not a failure.
///
/// # Errors
///
/// Returns an error if the join or the peer's listener fails.
pub async fn run(config: PeerConfig, role: Option<Role>) -> Result<()> {
    let boot = match bootstrap::join(config.registry_addr).await {
        Ok(boot) => boot,
        Err(PeerError::RegistryFull) => {
            tracing::info!("registry full, exiting");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let role = role.unwrap_or_else(Role::random);
    let index = boot.id.index();
    let sequences = Arc::new(SequenceTracker::new());
    tracing::info!(id = %boot.id, ?role, "peer starting");

    match role {
        Role::Buyer => {
            let coordinator = Arc::new(RequestCoordinator::new(
                index,
                TradeLog::new(config.output_dir.join(format!("peer{index}-purchases.log"))),
                TradeLog::new(config.output_dir.join(format!("peer{index}-latency.log"))),
                config.decision_timeout(),
            ));
            Buyer::new(boot, config, coordinator, sequences).run().await
        }
        Role::Seller => {
            let ledger = Arc::new(ReservationLedger::new(
                index,
                TradeLog::new(config.output_dir.join(format!("peer{index}-sales.log"))),
            ));
            Seller::new(boot, config, ledger, sequences).run().await
        }
    }
}
