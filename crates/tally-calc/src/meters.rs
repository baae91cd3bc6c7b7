//! Tank and pump difference reconciliation for fuel-shift reports.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tally_core::{Code, MeterReading, PriceList, StockAdjustment};

/// Merged figures for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductTotal {
    /// Product identifier.
    pub product_id: Code,
    /// Distinct tanks the readings drew from, in first-seen order.
    pub tank_ids: Vec<Code>,
    /// Number of readings merged.
    pub reading_count: usize,
    /// Σ (closing - opening).
    pub merged_difference: Decimal,
    /// Σ stock adjustment deltas for this product.
    pub adjustment_delta: Decimal,
    /// `merged_difference + adjustment_delta`.
    pub final_quantity: Decimal,
}

impl ProductTotal {
    /// `final_quantity * price`, or `None` when the price list has no entry.
    pub fn value(&self, prices: &impl PriceList) -> Option<Decimal> {
        prices
            .price_for(&self.product_id)
            .map(|price| self.final_quantity * price)
    }
}

/// Result of [`reconcile_meters`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MeterReconciliation {
    /// One entry per product, in first-seen order.
    pub products: Vec<ProductTotal>,
    /// Stock adjustments whose product had no readings.
    pub unmatched_adjustments: Vec<StockAdjustment>,
}

impl MeterReconciliation {
    /// Find a product's figures.
    #[must_use]
    pub fn product(&self, product_id: &str) -> Option<&ProductTotal> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    /// Σ value over products with a known price, and the ids lacking one.
    pub fn value_total(&self, prices: &impl PriceList) -> (Decimal, Vec<Code>) {
        let mut total = Decimal::ZERO;
        let mut unpriced = Vec::new();
        for product in &self.products {
            match product.value(prices) {
                Some(value) => total += value,
                None => unpriced.push(product.product_id.clone()),
            }
        }
        (total, unpriced)
    }
}

/// Merge readings by product and apply stock adjustments.
///
/// Several pumps feeding one product are summed. Each matching adjustment
/// contributes [`StockAdjustment::delta`], under which `+` lowers and `-`
/// raises the final quantity.
///
/// ```
/// use tally_calc::reconcile_meters;
/// use tally_core::{MeterReading, StockAdjustment, StockOperator};
/// use rust_decimal_macros::dec;
///
/// let readings = [
///     MeterReading::new("P", "T1", dec!(100), dec!(150)),
///     MeterReading::new("P", "T2", dec!(0), dec!(20)),
/// ];
/// let adjustments = [StockAdjustment::new("P", "T1", StockOperator::Minus, dec!(5))];
///
/// let result = reconcile_meters(&readings, &adjustments);
/// let diesel = result.product("P").unwrap();
/// assert_eq!(diesel.merged_difference, dec!(70));
/// assert_eq!(diesel.final_quantity, dec!(75));
/// ```
pub fn reconcile_meters(
    readings: &[MeterReading],
    adjustments: &[StockAdjustment],
) -> MeterReconciliation {
    let mut products: Vec<ProductTotal> = Vec::new();
    let mut index: HashMap<&Code, usize> = HashMap::new();

    for reading in readings {
        let idx = *index.entry(&reading.product_id).or_insert_with(|| {
            products.push(ProductTotal {
                product_id: reading.product_id.clone(),
                tank_ids: Vec::new(),
                reading_count: 0,
                merged_difference: Decimal::ZERO,
                adjustment_delta: Decimal::ZERO,
                final_quantity: Decimal::ZERO,
            });
            products.len() - 1
        });
        let group = &mut products[idx];
        group.reading_count += 1;
        group.merged_difference += reading.difference();
        if !group.tank_ids.contains(&reading.tank_id) {
            group.tank_ids.push(reading.tank_id.clone());
        }
    }

    let mut unmatched_adjustments = Vec::new();
    for adjustment in adjustments {
        match index.get(&adjustment.product_id) {
            Some(&idx) => products[idx].adjustment_delta += adjustment.delta(),
            None => unmatched_adjustments.push(adjustment.clone()),
        }
    }

    for group in &mut products {
        group.final_quantity = group.merged_difference + group.adjustment_delta;
    }

    MeterReconciliation {
        products,
        unmatched_adjustments,
    }
}

/// Dispensed quantity per tank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TankTotal {
    /// Tank identifier.
    pub tank_id: Code,
    /// Number of readings on this tank.
    pub reading_count: usize,
    /// Σ (closing - opening) over the tank's readings.
    pub difference: Decimal,
}

/// Sum differences per tank, in first-seen order.
pub fn tank_totals(readings: &[MeterReading]) -> Vec<TankTotal> {
    let mut totals: Vec<TankTotal> = Vec::new();
    for reading in readings {
        match totals.iter_mut().find(|t| t.tank_id == reading.tank_id) {
            Some(total) => {
                total.reading_count += 1;
                total.difference += reading.difference();
            }
            None => totals.push(TankTotal {
                tank_id: reading.tank_id.clone(),
                reading_count: 1,
                difference: reading.difference(),
            }),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::{MasterData, StockOperator};

    fn readings() -> Vec<MeterReading> {
        vec![
            MeterReading::new("P", "T1", dec!(100), dec!(150)),
            MeterReading::new("Q", "T3", dec!(10), dec!(12)),
            MeterReading::new("P", "T2", dec!(0), dec!(20)),
        ]
    }

    #[test]
    fn test_merge_by_product() {
        let result = reconcile_meters(&readings(), &[]);
        assert_eq!(result.products.len(), 2);

        let p = &result.products[0];
        assert_eq!(p.product_id, "P");
        assert_eq!(p.reading_count, 2);
        assert_eq!(p.merged_difference, dec!(70));
        assert_eq!(p.final_quantity, dec!(70));
        assert_eq!(p.tank_ids, vec![Code::new("T1"), Code::new("T2")]);

        assert_eq!(result.products[1].product_id, "Q");
        assert_eq!(result.products[1].final_quantity, dec!(2));
    }

    #[test]
    fn test_minus_operator_increases() {
        let adj = [StockAdjustment::new("P", "T1", StockOperator::Minus, dec!(5))];
        let result = reconcile_meters(&readings(), &adj);
        assert_eq!(result.product("P").unwrap().final_quantity, dec!(75));
    }

    #[test]
    fn test_plus_operator_decreases() {
        let adj = [StockAdjustment::new("P", "T1", StockOperator::Plus, dec!(5))];
        let result = reconcile_meters(&readings(), &adj);
        assert_eq!(result.product("P").unwrap().final_quantity, dec!(65));
        assert_eq!(result.product("P").unwrap().adjustment_delta, dec!(-5));
    }

    #[test]
    fn test_adjustment_tank_does_not_need_to_match() {
        let adj = [StockAdjustment::new("Q", "T9", StockOperator::Minus, dec!(1))];
        let result = reconcile_meters(&readings(), &adj);
        assert_eq!(result.product("Q").unwrap().final_quantity, dec!(3));
        assert!(result.unmatched_adjustments.is_empty());
    }

    #[test]
    fn test_unmatched_adjustments_reported() {
        let adj = [StockAdjustment::new("LPG", "T4", StockOperator::Plus, dec!(2))];
        let result = reconcile_meters(&readings(), &adj);
        assert_eq!(result.unmatched_adjustments, adj.to_vec());
        assert!(result.product("LPG").is_none());
    }

    #[test]
    fn test_empty_readings() {
        let result = reconcile_meters(&[], &[]);
        assert_eq!(result, MeterReconciliation::default());
    }

    #[test]
    fn test_values_from_price_list() {
        let data = MasterData::new().with_product("P", "Diesel", Some(dec!(3000)));
        let result = reconcile_meters(&readings(), &[]);

        assert_eq!(result.product("P").unwrap().value(&data), Some(dec!(210000)));
        assert_eq!(result.product("Q").unwrap().value(&data), None);

        let (total, unpriced) = result.value_total(&data);
        assert_eq!(total, dec!(210000));
        assert_eq!(unpriced, vec![Code::new("Q")]);
    }

    #[test]
    fn test_tank_totals() {
        let mut input = readings();
        input.push(MeterReading::new("P", "T1", dec!(150), dec!(155)));
        let totals = tank_totals(&input);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].tank_id, "T1");
        assert_eq!(totals[0].reading_count, 2);
        assert_eq!(totals[0].difference, dec!(55));
        assert_eq!(totals[1].tank_id, "T3");
        assert_eq!(totals[2].difference, dec!(20));
    }
}
