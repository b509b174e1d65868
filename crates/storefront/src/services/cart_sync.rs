//! Browser-cart merge planning.
//!
//! Guests keep a cart in browser storage; on sign-in the client posts it to
//! `/api/cart/merge`. Planning is pure so the rules are testable without a
//! database: unknown products are skipped (stale browser cache), out-of-stock
//! products are set aside, duplicate entries collapse to the larger quantity,
//! and quantities are clamped to the checkout line limit.

use std::collections::HashMap;

use hearthwood_core::ProductId;

use super::checkout::MAX_LINE_QUANTITY;

/// The result of planning a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Entries to upsert, quantity per product.
    pub entries: Vec<(ProductId, i32)>,
    /// Product ids posted by the browser that no longer exist.
    pub skipped: Vec<ProductId>,
    /// Products that exist but cannot be carted because stock is exhausted.
    pub out_of_stock: Vec<ProductId>,
}

impl MergePlan {
    /// Plan a merge of browser entries against current stock levels.
    ///
    /// `stock` maps each known product id to its stock count; ids for
    /// products that no longer exist are absent from the map.
    #[must_use]
    pub fn build(posted: &[(ProductId, i32)], stock: &HashMap<ProductId, i32>) -> Self {
        let mut quantities: HashMap<ProductId, i32> = HashMap::new();
        let mut order: Vec<ProductId> = Vec::new();
        let mut skipped: Vec<ProductId> = Vec::new();
        let mut out_of_stock: Vec<ProductId> = Vec::new();

        for &(product_id, quantity) in posted {
            if quantity < 1 {
                continue;
            }
            match stock.get(&product_id) {
                None => {
                    if !skipped.contains(&product_id) {
                        skipped.push(product_id);
                    }
                    continue;
                }
                Some(&level) if level < 1 => {
                    if !out_of_stock.contains(&product_id) {
                        out_of_stock.push(product_id);
                    }
                    continue;
                }
                Some(_) => {}
            }

            let clamped = quantity.min(MAX_LINE_QUANTITY);
            match quantities.get_mut(&product_id) {
                Some(existing) => *existing = (*existing).max(clamped),
                None => {
                    quantities.insert(product_id, clamped);
                    order.push(product_id);
                }
            }
        }

        let entries = order
            .into_iter()
            .map(|id| (id, quantities[&id]))
            .collect();

        Self {
            entries,
            skipped,
            out_of_stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(levels: &[(i32, i32)]) -> HashMap<ProductId, i32> {
        levels
            .iter()
            .map(|&(id, level)| (ProductId::new(id), level))
            .collect()
    }

    #[test]
    fn test_skips_unknown_products() {
        let posted = vec![(ProductId::new(1), 2), (ProductId::new(99), 1)];
        let plan = MergePlan::build(&posted, &stock(&[(1, 10)]));
        assert_eq!(plan.entries, vec![(ProductId::new(1), 2)]);
        assert_eq!(plan.skipped, vec![ProductId::new(99)]);
        assert!(plan.out_of_stock.is_empty());
    }

    #[test]
    fn test_sets_aside_out_of_stock_products() {
        let posted = vec![(ProductId::new(1), 2), (ProductId::new(2), 3)];
        let plan = MergePlan::build(&posted, &stock(&[(1, 10), (2, 0)]));
        assert_eq!(plan.entries, vec![(ProductId::new(1), 2)]);
        assert!(plan.skipped.is_empty());
        assert_eq!(plan.out_of_stock, vec![ProductId::new(2)]);
    }

    #[test]
    fn test_out_of_stock_reported_once() {
        let posted = vec![(ProductId::new(2), 1), (ProductId::new(2), 4)];
        let plan = MergePlan::build(&posted, &stock(&[(2, 0)]));
        assert!(plan.entries.is_empty());
        assert_eq!(plan.out_of_stock, vec![ProductId::new(2)]);
    }

    #[test]
    fn test_duplicate_entries_take_max() {
        let posted = vec![(ProductId::new(1), 2), (ProductId::new(1), 5)];
        let plan = MergePlan::build(&posted, &stock(&[(1, 10)]));
        assert_eq!(plan.entries, vec![(ProductId::new(1), 5)]);
    }

    #[test]
    fn test_clamps_to_line_limit() {
        let posted = vec![(ProductId::new(1), 500)];
        let plan = MergePlan::build(&posted, &stock(&[(1, 10)]));
        assert_eq!(plan.entries, vec![(ProductId::new(1), MAX_LINE_QUANTITY)]);
    }

    #[test]
    fn test_drops_non_positive_quantities() {
        let posted = vec![(ProductId::new(1), 0), (ProductId::new(2), -3)];
        let plan = MergePlan::build(&posted, &stock(&[(1, 10), (2, 10)]));
        assert!(plan.entries.is_empty());
        assert!(plan.skipped.is_empty());
        assert!(plan.out_of_stock.is_empty());
    }

    #[test]
    fn test_empty_posted_cart() {
        let plan = MergePlan::build(&[], &stock(&[(1, 10)]));
        assert_eq!(plan, MergePlan::default());
    }
}
