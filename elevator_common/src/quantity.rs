//! Quantity calculator: maps a catalog item and a stop count to a line quantity.
//!
//! Length-based materials (cable, rail) are sold by the meter and span the gaps
//! between stops, so items whose unit label contains `متر` use one stop fewer
//! for the current formulas. The legacy `simple_var` and `coeff_var` formulas
//! always use the raw stop count.
//!
//! The calculator never fails: a rule that cannot be evaluated yields `0.0`.
use crate::catalog::{CalcRule, CatalogItem};

/// Substring marking a meter-based unit label ("meter").
pub const METER_UNIT: &str = "متر";

/// Stop count seen by the current formulas for an item sold in `unit`.
pub fn effective_stop_count(unit: &str, target_stops: u32) -> u32 {
    if unit.contains(METER_UNIT) {
        target_stops.saturating_sub(1)
    } else {
        target_stops
    }
}

/// Quantity of `item` needed for an elevator with `target_stops` stops.
pub fn calculate_quantity(item: &CatalogItem, target_stops: u32) -> f64 {
    let effective = effective_stop_count(&item.unit, target_stops) as f64;

    match &item.rule {
        CalcRule::Fixed { quantity } => *quantity,
        CalcRule::PerStop => effective,
        CalcRule::Ratio { stops, quantity } => {
            let ratio = *quantity as f64 / *stops as f64;
            (ratio * effective).round()
        }
        CalcRule::StopCount => target_stops as f64,
        CalcRule::Coefficient {
            coefficient,
            base_quantity,
        } => target_stops as f64 * coefficient + base_quantity,
        CalcRule::Unusable { .. } => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Category;

    fn item(unit: &str, rule: CalcRule) -> CatalogItem {
        CatalogItem {
            item_id: 1,
            name: "item".to_string(),
            unit: unit.to_string(),
            category: Category::Gearless,
            unit_price: 1.0,
            rule,
            is_active: true,
        }
    }

    #[test]
    fn fixed_ignores_stop_count() {
        let it = item("حلقه", CalcRule::Fixed { quantity: 4.0 });
        for stops in [0, 2, 7, 20] {
            assert_eq!(calculate_quantity(&it, stops), 4.0);
        }
        let it = item("متر", CalcRule::Fixed { quantity: 15.0 });
        assert_eq!(calculate_quantity(&it, 9), 15.0);
    }

    #[test]
    fn per_stop_follows_effective_stops() {
        let piece = item("عدد", CalcRule::PerStop);
        let meter = item("متر", CalcRule::PerStop);
        assert_eq!(calculate_quantity(&piece, 7), 7.0);
        assert_eq!(calculate_quantity(&meter, 7), 6.0);
        assert_eq!(calculate_quantity(&meter, 0), 0.0);
    }

    #[test]
    fn ratio_rounds_to_nearest() {
        let it = item("عدد", CalcRule::Ratio { stops: 7, quantity: 1501 });
        assert_eq!(calculate_quantity(&it, 9), 1930.0);

        let it = item("متر", CalcRule::Ratio { stops: 7, quantity: 250 });
        // 250 / 7 * 6 = 214.28..
        assert_eq!(calculate_quantity(&it, 7), 214.0);
    }

    #[test]
    fn legacy_formulas_skip_meter_adjustment() {
        let cable = item("متر", CalcRule::Coefficient { coefficient: 20.0, base_quantity: 110.0 });
        assert_eq!(calculate_quantity(&cable, 7), 250.0);

        let labor = item("متر", CalcRule::StopCount);
        assert_eq!(calculate_quantity(&labor, 7), 7.0);
    }

    #[test]
    fn negative_base_quantity_is_kept_as_is() {
        let rail = item("شاخه", CalcRule::Coefficient { coefficient: 2.0, base_quantity: -1.0 });
        assert_eq!(calculate_quantity(&rail, 2), 3.0);
        assert_eq!(calculate_quantity(&rail, 0), -1.0);
    }

    #[test]
    fn unusable_rule_is_zero() {
        let it = item("عدد", CalcRule::Unusable { calc_type: "per_floor".to_string() });
        assert_eq!(calculate_quantity(&it, 7), 0.0);
    }

    #[test]
    fn meter_detection_is_substring_based() {
        assert_eq!(effective_stop_count("متر", 5), 4);
        assert_eq!(effective_stop_count("متر مربع", 5), 4);
        assert_eq!(effective_stop_count("عدد", 5), 5);
    }
}
