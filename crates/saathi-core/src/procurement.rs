//! # Aggregate Procurement List
//!
//! What the MFC has to buy: the per-item sum of quantities across all orders
//! that are not yet delivered.
//!
//! ```text
//! ORD-001 (pending)    प्याज 5 kg, टमाटर 3 kg
//! ORD-002 (confirmed)  प्याज 3 kg
//! ORD-003 (delivered)  प्याज 9 kg        ← ignored
//!                      ─────────────
//!                      प्याज 8 kg, टमाटर 3 kg
//! ```
//!
//! Recomputed on demand from whatever orders the caller can see.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Order;

/// One row of the procurement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementLine {
    pub name: String,
    pub unit: String,
    pub total_quantity: i64,
}

/// Groups open-order lines by (name, unit) and sums their quantities.
///
/// Rows appear in the order their (name, unit) pair was first seen.
pub fn aggregate<'a, I>(orders: I) -> Vec<ProcurementLine>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut lines: Vec<ProcurementLine> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for item in orders
        .into_iter()
        .filter(|order| order.is_open())
        .flat_map(|order| order.items.iter())
    {
        let key = (item.name.clone(), item.unit.clone());
        match index.get(&key) {
            Some(&pos) => lines[pos].total_quantity += item.quantity,
            None => {
                index.insert(key, lines.len());
                lines.push(ProcurementLine {
                    name: item.name.clone(),
                    unit: item.unit.clone(),
                    total_quantity: item.quantity,
                });
            }
        }
    }

    lines
}
