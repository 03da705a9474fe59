//! # Driver Commands
//!
//! Deliveries and waste collection.
//!
//! ## Waste Pickup Flow
//! ```text
//! log_waste_pickup(vendor, "3.5")
//!      │
//!      ├── not a positive number ──► "Invalid Weight" (destructive), nothing recorded
//!      │
//!      ▼
//! backend: WastePickup + vendor.waste_credits_balance += ₹17.50
//!      │
//!      ├──► "🌱 Waste Pickup Logged Successfully!"           (now)
//!      └──► "Vendor Notification Sent"                       (after delay)
//! ```

use std::collections::HashMap;

use saathi_core::{Money, Order, OrderStatus, Vendor, WastePickup, WasteWeight};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::notify_failure;
use crate::backend::{OrderFilter, PickupFilter};
use crate::error::ApiError;
use crate::notify::{Notification, Severity};
use crate::state::{AppState, DriverSession};

// =============================================================================
// View Models
// =============================================================================

/// An order on the driver's route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub order: Order,
    pub vendor_name: String,
    pub stall_name: String,
}

/// A vendor the driver can log a pickup for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorOption {
    pub vendor_id: String,
    pub label: String,
}

impl From<&Vendor> for VendorOption {
    fn from(vendor: &Vendor) -> Self {
        VendorOption {
            vendor_id: vendor.uid.clone(),
            label: format!("{} - {}", vendor.name, vendor.stall_name),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDashboard {
    pub deliveries: Vec<Delivery>,
    pub assigned_count: usize,
    pub completed_count: usize,
    pub pickups: Vec<WastePickup>,
    pub total_waste_credits: Money,
    pub vendors: Vec<VendorOption>,
}

// =============================================================================
// Commands
// =============================================================================

pub async fn driver_dashboard(
    state: &AppState,
    session: &DriverSession,
) -> Result<DriverDashboard, ApiError> {
    debug!(driver_id = session.driver_id(), "driver_dashboard command");

    let orders = state
        .backend
        .list_orders(OrderFilter::for_driver(session.driver_id()))
        .await?;
    let vendors = state.backend.list_vendors().await?;
    let pickups = state
        .backend
        .list_pickups(PickupFilter::for_driver(session.driver_id()))
        .await?;

    let by_id: HashMap<&str, &Vendor> = vendors.iter().map(|v| (v.uid.as_str(), v)).collect();
    let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

    Ok(DriverDashboard {
        assigned_count: count(OrderStatus::Assigned),
        completed_count: count(OrderStatus::Delivered),
        deliveries: orders
            .iter()
            .map(|order| {
                let vendor = by_id.get(order.vendor_id.as_str());
                Delivery {
                    vendor_name: vendor.map(|v| v.name.clone()).unwrap_or_default(),
                    stall_name: vendor.map(|v| v.stall_name.clone()).unwrap_or_default(),
                    order: order.clone(),
                }
            })
            .collect(),
        total_waste_credits: pickups.iter().map(|p| p.credits_earned).sum(),
        pickups,
        vendors: vendors.iter().map(VendorOption::from).collect(),
    })
}

/// Completes a delivery assigned to this driver.
pub async fn mark_delivered(
    state: &AppState,
    session: &DriverSession,
    order_id: &str,
) -> Result<Order, ApiError> {
    debug!(driver_id = session.driver_id(), order_id, "mark_delivered command");

    let order = state
        .backend
        .mark_delivered(order_id, session.driver_id())
        .await
        .map_err(ApiError::from)
        .inspect_err(notify_failure(&state.notifier, "Delivery Failed"))?;

    state.notifier.success(
        "Delivery Completed",
        format!("Order {} marked as delivered", order.order_id),
    );

    Ok(order)
}

/// Records collected waste for a vendor from the driver's form input (kg).
///
/// On success the vendor is credited at once and a "vendor notified"
/// message follows after the configured delay.
pub async fn log_waste_pickup(
    state: &AppState,
    session: &mut DriverSession,
    vendor_id: &str,
    weight_kg: &str,
) -> Result<WastePickup, ApiError> {
    debug!(driver_id = session.driver_id(), vendor_id, weight_kg, "log_waste_pickup command");

    let weight = match WasteWeight::parse_kg(weight_kg) {
        Ok(weight) => weight,
        Err(e) => {
            warn!(weight_kg, error = %e, "Rejected waste weight");
            state
                .notifier
                .destructive("Invalid Weight", "Please enter a valid waste weight");
            return Err(e.into());
        }
    };

    let vendor_name = state
        .backend
        .get_vendor(vendor_id)
        .await
        .map(|vendor| vendor.name)
        .map_err(ApiError::from)
        .inspect_err(notify_failure(&state.notifier, "Waste Pickup Failed"))?;

    let pickup = state
        .backend
        .log_waste_pickup(vendor_id, session.driver_id(), weight)
        .await
        .map_err(ApiError::from)
        .inspect_err(notify_failure(&state.notifier, "Waste Pickup Failed"))?;

    info!(
        pickup_id = %pickup.pickup_id,
        driver_id = session.driver_id(),
        vendor_id,
        credits = %pickup.credits_earned,
        "Waste pickup recorded by driver"
    );

    state.notifier.success(
        "🌱 Waste Pickup Logged Successfully!",
        format!(
            "{} waste collected. {} credits added to {}'s account.",
            pickup.weight, pickup.credits_earned, vendor_name
        ),
    );

    let delay = state.config.vendor_notification_delay();
    session.deferred().schedule(
        delay,
        Notification::new(
            "Vendor Notification Sent",
            format!("{} has been notified about their new waste credits!", vendor_name),
            Severity::Info,
        ),
    );

    Ok(pickup)
}
