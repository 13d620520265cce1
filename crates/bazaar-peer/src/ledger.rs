//! Seller inventory monitor.

use crate::{catalog, TradeLog};
use parking_lot::Mutex;

/// One product batch: what is on the shelf and what is on hold.
#[derive(Debug)]
struct Inventory {
    product: String,
    available: u32,
    reserved: u32,
}

/// Guards a seller's inventory through the reserve/settle lifecycle.
///
/// A reply to a lookup first reserves one unit; the buyer's decision
/// later settles the reservation as either a committed sale or a
/// release back to the shelf. At most `available` reservations can be
/// live at once, enforced by the check-and-decrement under the lock.
/// The ledger restocks itself with a fresh product and a random
/// positive quantity exactly when a committed sale drains both counts
/// to zero.
pub struct ReservationLedger {
    seller_index: u32,
    sale_log: TradeLog,
    inventory: Mutex<Inventory>,
}

impl ReservationLedger {
    /// Creates a ledger for the seller at `seller_index`, stocked with
    /// a random first batch. Committed sales are appended to
    /// `sale_log`.
    #[must_use]
    pub fn new(seller_index: u32, sale_log: TradeLog) -> Self {
        Self {
            seller_index,
            sale_log,
            inventory: Mutex::new(Inventory {
                product: catalog::pick_product(""),
                available: catalog::pick_quantity(),
                reserved: 0,
            }),
        }
    }

    /// Creates a ledger with a fixed first batch instead of a random
    /// one. Later restocks are still random.
    #[must_use]
    pub fn with_stock(
        seller_index: u32,
        sale_log: TradeLog,
        product: impl Into<String>,
        available: u32,
    ) -> Self {
        Self {
            seller_index,
            sale_log,
            inventory: Mutex::new(Inventory {
                product: product.into(),
                available,
                reserved: 0,
            }),
        }
    }

    /// Returns the product currently stocked.
    #[must_use]
    pub fn product(&self) -> String {
        self.inventory.lock().product.clone()
    }

    /// Returns `(available, reserved)` counts.
    #[must_use]
    pub fn counts(&self) -> (u32, u32) {
        let inv = self.inventory.lock();
        (inv.available, inv.reserved)
    }

    /// Places one unit on hold. Succeeds iff a unit is available.
    pub fn reserve(&self) -> bool {
        let mut inv = self.inventory.lock();
        if inv.available == 0 {
            return false;
        }
        inv.available -= 1;
        inv.reserved += 1;
        true
    }

    /// Settles one reservation. Fails if nothing is reserved.
    ///
    /// A purchase consumes the unit, records the sale, and restocks
    /// when the batch is drained; a rejection returns the unit to the
    /// shelf.
    pub fn settle(&self, purchased: bool, buyer_index: u32) -> bool {
        let mut inv = self.inventory.lock();
        if inv.reserved == 0 {
            return false;
        }
        inv.reserved -= 1;
        if purchased {
            self.sale_log.append(&format!(
                "Peer ({}) sold {} to Peer ({}), remaining inventory: {}",
                self.seller_index,
                inv.product,
                buyer_index,
                inv.available + inv.reserved
            ));
            if inv.available == 0 && inv.reserved == 0 {
                inv.product = catalog::pick_product(&inv.product);
                inv.available = catalog::pick_quantity();
                tracing::info!(
                    seller = self.seller_index,
                    product = %inv.product,
                    quantity = inv.available,
                    "restocked"
                );
            }
        } else {
            inv.available += 1;
        }
        true
    }
}
