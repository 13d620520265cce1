//! Buyer request monitor.

use crate::{catalog, TradeLog};
use bazaar_types::PeerId;
use parking_lot::Mutex;
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// One seller's reply within a request cycle and whether it won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyOutcome {
    /// The seller that replied.
    pub seller: PeerId,
    /// True for exactly the winning seller of the cycle.
    pub chosen: bool,
}

#[derive(Debug)]
struct Cycle {
    product: String,
    active: bool,
    started: Instant,
    outcomes: Vec<ReplyOutcome>,
    latencies: Vec<Duration>,
    waiters: Vec<(u32, oneshot::Sender<bool>)>,
    cycle_means_ms: Vec<f64>,
}

/// Owns a buyer's single in-flight product request.
///
/// Each cycle runs Idle -> Active ([`RequestCoordinator::new_request`])
/// -> zero or more accepted replies ([`RequestCoordinator::buy`]) ->
/// Decided ([`RequestCoordinator::choose_winner`]) -> Idle. Accepted
/// replies suspend until the decision: each one parks on a oneshot
/// channel that `choose_winner` resolves, so exactly one caller per
/// cycle sees true whenever at least one reply arrived.
///
/// By default a replying seller waits for the decision indefinitely;
/// a `decision_timeout` bounds that wait when configured, resolving a
/// timed-out reply as not chosen.
pub struct RequestCoordinator {
    buyer_index: u32,
    outcome_log: TradeLog,
    latency_log: TradeLog,
    decision_timeout: Option<Duration>,
    cycle: Mutex<Cycle>,
}

impl RequestCoordinator {
    /// Creates a coordinator for the buyer at `buyer_index`. Request
    /// outcomes go to `outcome_log`, per-cycle latency means to
    /// `latency_log`.
    #[must_use]
    pub fn new(
        buyer_index: u32,
        outcome_log: TradeLog,
        latency_log: TradeLog,
        decision_timeout: Option<Duration>,
    ) -> Self {
        Self {
            buyer_index,
            outcome_log,
            latency_log,
            decision_timeout,
            cycle: Mutex::new(Cycle {
                product: String::new(),
                active: false,
                started: Instant::now(),
                outcomes: Vec::new(),
                latencies: Vec::new(),
                waiters: Vec::new(),
                cycle_means_ms: Vec::new(),
            }),
        }
    }

    /// Starts a new request cycle and returns the product to look up,
    /// guaranteed different from the previous cycle's product.
    pub fn new_request(&self) -> String {
        let mut cycle = self.cycle.lock();
        cycle.product = catalog::pick_product(&cycle.product);
        cycle.active = true;
        cycle.started = Instant::now();
        cycle.outcomes.clear();
        cycle.latencies.clear();
        self.outcome_log.append(&format!(
            "Peer ({}) {} request: Issued",
            self.buyer_index, cycle.product
        ));
        cycle.product.clone()
    }

    /// Registers a seller's reply and waits for the cycle's decision.
    ///
    /// Returns false immediately, without blocking, when no active
    /// request matches `product`. An accepted reply records its
    /// latency and suspends until [`Self::choose_winner`] runs, then
    /// returns true only for the chosen seller.
    pub async fn buy(&self, product: &str, seller: PeerId) -> bool {
        let rx = {
            let mut cycle = self.cycle.lock();
            if !cycle.active || cycle.product != product {
                return false;
            }
            if !cycle.outcomes.iter().any(|o| o.seller == seller) {
                cycle.outcomes.push(ReplyOutcome {
                    seller,
                    chosen: false,
                });
            }
            let elapsed = cycle.started.elapsed();
            cycle.latencies.push(elapsed);
            let (tx, rx) = oneshot::channel();
            cycle.waiters.push((seller.index(), tx));
            rx
        };
        match self.decision_timeout {
            Some(limit) => tokio::time::timeout(limit, rx)
                .await
                .ok()
                .and_then(std::result::Result::ok)
                .unwrap_or(false),
            None => rx.await.unwrap_or(false),
        }
    }

    /// Decides the cycle: marks one respondent chosen uniformly at
    /// random (if any replied), records the outcome lines, wakes every
    /// suspended reply, and returns the cycle's outcomes.
    pub fn choose_winner(&self) -> Vec<ReplyOutcome> {
        let mut cycle = self.cycle.lock();
        cycle.active = false;
        if !cycle.outcomes.is_empty() {
            let winner = rand::thread_rng().gen_range(0..cycle.outcomes.len());
            cycle.outcomes[winner].chosen = true;
            let total: Duration = cycle.latencies.iter().sum();
            let mean_ms = total.as_secs_f64() * 1000.0 / cycle.latencies.len() as f64;
            cycle.cycle_means_ms.push(mean_ms);
        }
        let request = format!("Peer ({}) {} request", self.buyer_index, cycle.product);
        if cycle.outcomes.is_empty() {
            self.outcome_log.append(&format!("{request}: No Response"));
        } else {
            for outcome in &cycle.outcomes {
                let mut line = format!(
                    "{request}: Peer ({}) responds with {} available",
                    outcome.seller.index(),
                    cycle.product
                );
                if outcome.chosen {
                    line.push_str(" (chosen for purchase)");
                }
                self.outcome_log.append(&line);
            }
        }
        let waiters = std::mem::take(&mut cycle.waiters);
        for (seller_index, tx) in waiters {
            let chosen = cycle
                .outcomes
                .iter()
                .any(|o| o.seller.index() == seller_index && o.chosen);
            let _ = tx.send(chosen);
        }
        cycle.outcomes.clone()
    }

    /// Returns how many replies the active cycle has accepted so far.
    #[must_use]
    pub fn reply_count(&self) -> usize {
        self.cycle.lock().outcomes.len()
    }

    /// Writes every cycle's mean reply latency and the overall mean.
    pub fn write_latency_report(&self) {
        let cycle = self.cycle.lock();
        if cycle.cycle_means_ms.is_empty() {
            return;
        }
        let mut total = 0.0;
        for mean in &cycle.cycle_means_ms {
            total += mean;
            self.latency_log.append(&format!("{mean:.3}"));
        }
        self.latency_log.append(&format!(
            "Overall Response Time Average: {:.3}ms",
            total / cycle.cycle_means_ms.len() as f64
        ));
    }
}
