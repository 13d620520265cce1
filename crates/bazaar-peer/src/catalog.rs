//! Product selection helpers.

use crate::{MAX_STOCK, PRODUCTS};
use rand::Rng;

/// Picks a product uniformly at random, guaranteed different from
/// `previous`. An unknown or empty `previous` never matches, so any
/// product can come back.
pub fn pick_product(previous: &str) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let candidate = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
        if candidate != previous {
            return candidate.to_string();
        }
    }
}

/// Picks a random positive restock quantity.
pub fn pick_quantity() -> u32 {
    rand::thread_rng().gen_range(1..=MAX_STOCK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_repeats_the_previous_product() {
        let mut previous = String::new();
        for _ in 0..200 {
            let next = pick_product(&previous);
            assert_ne!(next, previous);
            assert!(PRODUCTS.contains(&next.as_str()));
            previous = next;
        }
    }

    #[test]
    fn quantities_are_positive_and_bounded() {
        for _ in 0..200 {
            let qty = pick_quantity();
            assert!((1..=MAX_STOCK).contains(&qty));
        }
    }
}
