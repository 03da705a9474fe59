//! # Manager Commands
//!
//! Order control and procurement for the MFC manager.

use saathi_core::{MfcUser, Money, Order, OrderStatus, ProcurementLine};
use serde::Serialize;
use tracing::{debug, info};

use super::notify_failure;
use crate::backend::OrderFilter;
use crate::error::ApiError;
use crate::state::{AppState, ManagerSession};

/// Order counts and revenue shown in the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    /// Confirmed or assigned.
    pub in_progress: usize,
    pub delivered: usize,
    /// Σ total cost over every order, whatever its status.
    pub total_revenue: Money,
}

impl OrderStats {
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(OrderStats::default(), |mut stats, order| {
            stats.total += 1;
            stats.total_revenue = stats.total_revenue.saturating_add(order.total_cost);
            match order.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Confirmed | OrderStatus::Assigned => stats.in_progress += 1,
                OrderStatus::Delivered => stats.delivered += 1,
            }
            stats
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub orders: Vec<Order>,
    pub stats: OrderStats,
    pub drivers: Vec<MfcUser>,
    pub procurement: Vec<ProcurementLine>,
}

pub async fn manager_dashboard(
    state: &AppState,
    session: &ManagerSession,
) -> Result<ManagerDashboard, ApiError> {
    debug!(manager = %session.user().uid, "manager_dashboard command");

    let orders = state.backend.list_orders(OrderFilter::all()).await?;
    let drivers = state.backend.list_drivers().await?;
    let procurement = state.backend.procurement().await?;

    Ok(ManagerDashboard {
        stats: OrderStats::from_orders(&orders),
        orders,
        drivers,
        procurement,
    })
}

/// Moves an order one step forward.
///
/// `driver_id` is needed when the target is `assigned`.
pub async fn update_order_status(
    state: &AppState,
    session: &ManagerSession,
    order_id: &str,
    target: OrderStatus,
    driver_id: Option<&str>,
) -> Result<Order, ApiError> {
    debug!(manager = %session.user().uid, order_id, %target, "update_order_status command");

    let order = state
        .backend
        .update_order_status(order_id, target, driver_id)
        .await
        .map_err(ApiError::from)
        .inspect_err(notify_failure(&state.notifier, "Order Update Failed"))?;

    info!(order_id, status = %order.status, manager = %session.user().uid, "Order updated by manager");
    state.notifier.success(
        "Order Updated",
        format!("Order {} status changed to {}", order.order_id, order.status),
    );

    Ok(order)
}

pub async fn confirm_order(
    state: &AppState,
    session: &ManagerSession,
    order_id: &str,
) -> Result<Order, ApiError> {
    update_order_status(state, session, order_id, OrderStatus::Confirmed, None).await
}

pub async fn assign_driver(
    state: &AppState,
    session: &ManagerSession,
    order_id: &str,
    driver_id: &str,
) -> Result<Order, ApiError> {
    update_order_status(state, session, order_id, OrderStatus::Assigned, Some(driver_id)).await
}

/// What to buy for all orders not yet delivered.
pub async fn procurement_list(
    state: &AppState,
    session: &ManagerSession,
) -> Result<Vec<ProcurementLine>, ApiError> {
    debug!(manager = %session.user().uid, "procurement_list command");
    Ok(state.backend.procurement().await?)
}
