//! # Scripted Walkthrough
//!
//! One pass through every dashboard, in the order the roles meet in real
//! life:
//!
//! ```text
//! vendor   OTP login ─► fill cart ─► place order (part waste credits)
//! manager  MFC login ─► procurement ─► confirm ─► assign driver
//! driver   MFC login ─► deliver ─► log 3.5 kg waste ─► vendor notified
//! ```

use std::time::Duration;

use anyhow::Context;
use saathi_core::{Money, Order, ProcurementLine, Vendor, WastePickup};
use serde::Serialize;
use tracing::info;

use crate::auth::{self, DEMO_DRIVER_EMAIL, DEMO_MANAGER_EMAIL, DEMO_PASSWORD, DEMO_VENDOR_PHONE};
use crate::commands::manager::OrderStats;
use crate::commands::{driver, manager, vendor};
use crate::config::AppConfig;
use crate::notify::Notification;
use crate::state::AppState;

/// Waste credits the demo vendor spends on the order.
const DEMO_WASTE_CREDITS: Money = Money::from_rupees(50);

/// Everything that happened during the walkthrough.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub order: Order,
    pub procurement: Vec<ProcurementLine>,
    pub stats: OrderStats,
    pub pickup: WastePickup,
    pub vendor: Vendor,
    pub notifications: Vec<Notification>,
}

/// Runs the walkthrough against a fresh backend built from `config`.
pub async fn run_demo(config: AppConfig) -> anyhow::Result<DemoReport> {
    let (state, mut feed) = AppState::start(config);

    // Vendor
    let challenge = auth::send_otp(&state, DEMO_VENDOR_PHONE).await?;
    let vendor_session = auth::verify_otp(&state, &challenge, "123456").await?;
    let vendor = vendor_session
        .as_vendor()
        .context("OTP login did not open a vendor session")?;

    vendor::add_to_cart(&state, vendor, "1")?;
    vendor::add_to_cart(&state, vendor, "3")?;
    vendor::update_cart_item(vendor, "1", 4);
    let order = vendor::place_order(&state, vendor, DEMO_WASTE_CREDITS).await?;
    info!(order_id = %order.order_id, total = %order.total_cost, "Demo order placed");

    // Manager
    let manager_session = auth::mfc_login(&state, DEMO_MANAGER_EMAIL, DEMO_PASSWORD).await?;
    let manager = manager_session
        .as_manager()
        .context("manager login did not open a manager session")?;

    let procurement = manager::procurement_list(&state, manager).await?;
    manager::confirm_order(&state, manager, &order.order_id).await?;

    // Driver
    let mut driver_session = auth::mfc_login(&state, DEMO_DRIVER_EMAIL, DEMO_PASSWORD).await?;
    let driver_id = driver_session.user_id().to_string();
    manager::assign_driver(&state, manager, &order.order_id, &driver_id).await?;

    let driver = driver_session
        .as_driver_mut()
        .context("driver login did not open a driver session")?;
    driver::mark_delivered(&state, driver, &order.order_id).await?;
    let pickup = driver::log_waste_pickup(&state, driver, &order.vendor_id, "3.5").await?;

    // Let the deferred "vendor notified" message fire before logging out
    tokio::time::sleep(state.config.vendor_notification_delay() + Duration::from_millis(10)).await;

    let stats = manager::manager_dashboard(&state, manager).await?.stats;
    let vendor_after = state.backend.get_vendor(&order.vendor_id).await?;

    driver_session.logout();
    manager_session.logout();
    vendor_session.logout();

    state.backend.shutdown().await?;

    Ok(DemoReport {
        order,
        procurement,
        stats,
        pickup,
        vendor: vendor_after,
        notifications: feed.drain(),
    })
}
