//! Session reconciliation arithmetic.
//!
//! Pure derivation with no side effects. The calculated balance is never
//! stored independently of its inputs until close time, when it is frozen
//! on the session row together with the difference.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of reconciling a counted drawer amount against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Sum of all movement amounts for the session.
    pub calculated: Decimal,
    /// Counted amount minus calculated balance. Positive = surplus,
    /// negative = shortage, zero = the drawer reconciles exactly.
    pub difference: Decimal,
}

/// Sums the signed movement amounts of a session.
#[must_use]
pub fn calculated_balance<'a, I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = &'a Decimal>,
{
    amounts.into_iter().copied().sum()
}

/// Counted amount minus calculated balance.
#[must_use]
pub fn difference(counted: Decimal, calculated: Decimal) -> Decimal {
    counted - calculated
}

/// Reconciles a counted amount against a session's movement amounts.
#[must_use]
pub fn reconcile(counted: Decimal, amounts: &[Decimal]) -> Reconciliation {
    let calculated = calculated_balance(amounts);
    Reconciliation {
        calculated,
        difference: difference(counted, calculated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_reconciliation() {
        // [+100 (initial), +50, -20], counted 130.
        let amounts = [dec!(100), dec!(50), dec!(-20)];
        let result = reconcile(dec!(130), &amounts);

        assert_eq!(result.calculated, dec!(130));
        assert_eq!(result.difference, dec!(0));
    }

    #[test]
    fn test_shortage() {
        let amounts = [dec!(100), dec!(50), dec!(-20)];
        let result = reconcile(dec!(125), &amounts);

        assert_eq!(result.difference, dec!(-5));
    }

    #[test]
    fn test_surplus() {
        let amounts = [dec!(100), dec!(45), dec!(-30)];
        let result = reconcile(dec!(120), &amounts);

        assert_eq!(result.calculated, dec!(115));
        assert_eq!(result.difference, dec!(5));
    }

    #[test]
    fn test_empty_ledger() {
        let result = reconcile(dec!(0), &[]);
        assert_eq!(result.calculated, dec!(0));
        assert_eq!(result.difference, dec!(0));
    }

    #[test]
    fn test_exact_decimal_cents() {
        // 0.1 + 0.2 must be exactly 0.3, not a float approximation.
        let amounts = [dec!(0.10), dec!(0.20)];
        let result = reconcile(dec!(0.30), &amounts);
        assert_eq!(result.difference, dec!(0));
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn amounts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec(amount_strategy(), 0..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// *For any* ledger, counting exactly the calculated balance yields
        /// a zero difference.
        #[test]
        fn prop_counting_calculated_reconciles_exactly(
            amounts in amounts_strategy(20),
        ) {
            let calculated = calculated_balance(&amounts);
            let result = reconcile(calculated, &amounts);
            prop_assert_eq!(result.difference, Decimal::ZERO);
        }

        /// *For any* ledger and counted amount, the identity
        /// counted = calculated + difference holds.
        #[test]
        fn prop_difference_identity(
            counted in amount_strategy(),
            amounts in amounts_strategy(20),
        ) {
            let result = reconcile(counted, &amounts);
            prop_assert_eq!(result.calculated + result.difference, counted);
        }

        /// *For any* ledger, appending a movement shifts the calculated
        /// balance by exactly that amount.
        #[test]
        fn prop_append_shifts_balance(
            amounts in amounts_strategy(20),
            extra in amount_strategy(),
        ) {
            let before = calculated_balance(&amounts);
            let mut with_extra = amounts.clone();
            with_extra.push(extra);
            prop_assert_eq!(calculated_balance(&with_extra), before + extra);
        }

        /// *For any* counted amount over an empty ledger, the difference is
        /// the counted amount itself.
        #[test]
        fn prop_empty_ledger_difference(counted in amount_strategy()) {
            let result = reconcile(counted, &[]);
            prop_assert_eq!(result.calculated, Decimal::ZERO);
            prop_assert_eq!(result.difference, counted);
        }
    }
}
