//! Capacity accounting for ticket sales.
//!
//! A ticket has a fixed number of spaces; purchases against it accumulate.
//! These functions answer two questions: how many spaces are left, and does
//! a requested quantity fit. They are pure so they can be called from inside
//! a storage transaction without dragging IO into the decision.

use thiserror::Error;

use crate::models::TicketPurchase;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("not enough spaces available: requested {requested}, remaining {remaining}")]
    InsufficientCapacity { requested: i32, remaining: i32 },
}

/// Total quantity already sold against a ticket.
///
/// Widened to i64 so a pathological pile of purchase rows cannot overflow
/// the sum before it is compared against capacity.
pub fn sold_quantity<'a>(purchases: impl IntoIterator<Item = &'a TicketPurchase>) -> i64 {
    purchases.into_iter().map(|p| i64::from(p.quantity)).sum()
}

/// Spaces still available on a ticket with the given capacity and sold total.
///
/// Never reports a negative number: if stored purchases somehow exceed
/// capacity, the ticket is simply full.
pub fn remaining_spaces(capacity: i32, sold: i64) -> i32 {
    let remaining = i64::from(capacity) - sold;
    remaining.clamp(0, i64::from(i32::MAX)) as i32
}

/// Decide whether a purchase of `requested` spaces fits.
///
/// Returns the remaining count after the purchase when admitted, so callers
/// can report availability without recomputing.
pub fn admit_purchase(
    capacity: i32,
    sold: i64,
    requested: i32,
) -> Result<i32, AdmissionError> {
    if requested < 1 {
        return Err(AdmissionError::InvalidQuantity);
    }

    let remaining = remaining_spaces(capacity, sold);
    if requested > remaining {
        return Err(AdmissionError::InsufficientCapacity {
            requested,
            remaining,
        });
    }

    Ok(remaining - requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_ticket_has_full_capacity() {
        assert_eq!(remaining_spaces(10, 0), 10);
    }

    #[test]
    fn sold_quantity_sums_purchases() {
        let purchases = vec![test_purchase(3), test_purchase(4), test_purchase(1)];
        assert_eq!(sold_quantity(&purchases), 8);
    }

    #[test]
    fn exact_fit_is_admitted() {
        assert_eq!(admit_purchase(10, 0, 10), Ok(0));
    }

    #[test]
    fn one_over_capacity_is_rejected() {
        assert_eq!(
            admit_purchase(10, 0, 11),
            Err(AdmissionError::InsufficientCapacity {
                requested: 11,
                remaining: 10,
            })
        );
    }

    #[test]
    fn sold_out_ticket_rejects_any_quantity() {
        for requested in 1..=3 {
            assert_eq!(
                admit_purchase(5, 5, requested),
                Err(AdmissionError::InsufficientCapacity {
                    requested,
                    remaining: 0,
                })
            );
        }
    }

    #[test]
    fn zero_and_negative_quantities_are_invalid() {
        assert_eq!(admit_purchase(10, 0, 0), Err(AdmissionError::InvalidQuantity));
        assert_eq!(admit_purchase(10, 0, -3), Err(AdmissionError::InvalidQuantity));
    }

    #[test]
    fn oversold_ticket_reports_zero_remaining() {
        // Stored purchases past capacity read as a full ticket, not a panic.
        assert_eq!(remaining_spaces(5, 9), 0);
        assert_eq!(
            admit_purchase(5, 9, 1),
            Err(AdmissionError::InsufficientCapacity {
                requested: 1,
                remaining: 0,
            })
        );
    }

    #[test]
    fn zero_capacity_ticket_admits_nothing() {
        assert_eq!(
            admit_purchase(0, 0, 1),
            Err(AdmissionError::InsufficientCapacity {
                requested: 1,
                remaining: 0,
            })
        );
    }

    fn test_purchase(quantity: i32) -> TicketPurchase {
        use chrono::Utc;
        use uuid::Uuid;

        TicketPurchase {
            id: Uuid::new_v4(),
            ticket_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            quantity,
            created_at: Utc::now(),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: admitting every request the ledger allows, in any order,
        /// never pushes the sold total past capacity, and the remaining count
        /// never increases and never goes negative.
        #[test]
        fn admitted_purchases_never_exceed_capacity(
            capacity in 0i32..10_000,
            requests in prop::collection::vec(-5i32..200, 0..50)
        ) {
            let mut sold: i64 = 0;
            let mut last_remaining = remaining_spaces(capacity, sold);

            for requested in requests {
                if let Ok(after) = admit_purchase(capacity, sold, requested) {
                    sold += i64::from(requested);
                    prop_assert!(sold <= i64::from(capacity));
                    prop_assert_eq!(after, remaining_spaces(capacity, sold));
                }

                let remaining = remaining_spaces(capacity, sold);
                prop_assert!(remaining >= 0);
                prop_assert!(remaining <= last_remaining);
                last_remaining = remaining;
            }
        }
    }
}
