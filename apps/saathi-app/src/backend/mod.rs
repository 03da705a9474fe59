//! # Backend-of-Record
//!
//! Everything that would live on a server: vendors, staff accounts, orders
//! and the waste pickup ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Backend-of-Record                                  │
//! │                                                                         │
//! │   vendor session ──┐                                                    │
//! │                    │  BackendCommand         ┌───────────────────────┐  │
//! │   manager session ─┼────────────────────────►│     MockBackend       │  │
//! │                    │  (mpsc, bounded)        │  (single tokio task)  │  │
//! │   driver session ──┘                         │                       │  │
//! │          ▲                                   │  vendors   staff      │  │
//! │          │  CoreResult<T>                    │  orders    pickups    │  │
//! │          └───────────────────────────────────│                       │  │
//! │               (oneshot per request)          └───────────────────────┘  │
//! │                                                                         │
//! │  Commands are handled one at a time, so every mutation finishes        │
//! │  before the next one starts.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers only ever see cloned projections of backend records.

pub mod mock;

use saathi_core::{
    Cart, CoreError, CoreResult, MfcUser, Money, Order, OrderStatus, ProcurementLine, Role, Vendor,
    WastePickup, WasteWeight,
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

pub use mock::MockBackend;

// =============================================================================
// Backend Error
// =============================================================================

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend processed the request and rejected it.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backend task is gone.
    #[error("Backend channel closed")]
    ChannelClosed,
}

pub type BackendResult<T> = Result<T, BackendError>;

// =============================================================================
// Filters
// =============================================================================

/// Which orders a listing should return. Empty filter means all orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub vendor_id: Option<String>,
    pub driver_id: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn all() -> Self {
        OrderFilter::default()
    }

    pub fn for_vendor(vendor_id: impl Into<String>) -> Self {
        OrderFilter {
            vendor_id: Some(vendor_id.into()),
            ..Default::default()
        }
    }

    pub fn for_driver(driver_id: impl Into<String>) -> Self {
        OrderFilter {
            driver_id: Some(driver_id.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.vendor_id.as_ref().map_or(true, |v| *v == order.vendor_id)
            && self
                .driver_id
                .as_ref()
                .map_or(true, |d| order.driver_id.as_ref() == Some(d))
            && self.status.map_or(true, |s| s == order.status)
    }
}

/// Which pickups a listing should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickupFilter {
    pub vendor_id: Option<String>,
    pub driver_id: Option<String>,
}

impl PickupFilter {
    pub fn all() -> Self {
        PickupFilter::default()
    }

    pub fn for_vendor(vendor_id: impl Into<String>) -> Self {
        PickupFilter {
            vendor_id: Some(vendor_id.into()),
            driver_id: None,
        }
    }

    pub fn for_driver(driver_id: impl Into<String>) -> Self {
        PickupFilter {
            vendor_id: None,
            driver_id: Some(driver_id.into()),
        }
    }

    pub fn matches(&self, pickup: &WastePickup) -> bool {
        self.vendor_id.as_ref().map_or(true, |v| *v == pickup.vendor_id)
            && self.driver_id.as_ref().map_or(true, |d| *d == pickup.driver_id)
    }
}

// =============================================================================
// Commands
// =============================================================================

type Reply<T> = oneshot::Sender<CoreResult<T>>;

/// Requests understood by the backend actor.
#[derive(Debug)]
pub(crate) enum BackendCommand {
    GetVendor {
        vendor_id: String,
        reply: Reply<Vendor>,
    },
    FindVendorByPhone {
        phone: String,
        reply: Reply<Vendor>,
    },
    ListVendors {
        reply: Reply<Vec<Vendor>>,
    },
    StaffSignIn {
        email: String,
        role: Role,
        reply: Reply<MfcUser>,
    },
    ListDrivers {
        reply: Reply<Vec<MfcUser>>,
    },
    PlaceOrder {
        vendor_id: String,
        cart: Cart,
        waste_credits_requested: Money,
        reply: Reply<Order>,
    },
    ListOrders {
        filter: OrderFilter,
        reply: Reply<Vec<Order>>,
    },
    UpdateOrderStatus {
        order_id: String,
        target: OrderStatus,
        driver_id: Option<String>,
        reply: Reply<Order>,
    },
    MarkDelivered {
        order_id: String,
        driver_id: String,
        reply: Reply<Order>,
    },
    LogWastePickup {
        vendor_id: String,
        driver_id: String,
        weight: WasteWeight,
        reply: Reply<WastePickup>,
    },
    ListPickups {
        filter: PickupFilter,
        reply: Reply<Vec<WastePickup>>,
    },
    Procurement {
        reply: Reply<Vec<ProcurementLine>>,
    },
    Shutdown,
}

// =============================================================================
// Backend Handle
// =============================================================================

/// Cloneable handle to the backend actor.
#[derive(Debug, Clone)]
pub struct BackendHandle {
    cmd_tx: mpsc::Sender<BackendCommand>,
}

impl BackendHandle {
    pub(crate) fn new(cmd_tx: mpsc::Sender<BackendCommand>) -> Self {
        BackendHandle { cmd_tx }
    }

    /// Sends a command and waits for its reply.
    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> BackendCommand,
    ) -> BackendResult<T> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(reply))
            .await
            .map_err(|_| BackendError::ChannelClosed)?;
        let result = rx.await.map_err(|_| BackendError::ChannelClosed)?;
        Ok(result?)
    }

    pub async fn get_vendor(&self, vendor_id: &str) -> BackendResult<Vendor> {
        let vendor_id = vendor_id.to_string();
        self.request(|reply| BackendCommand::GetVendor { vendor_id, reply })
            .await
    }

    /// Looks a vendor up by normalized 10-digit phone number.
    pub async fn find_vendor_by_phone(&self, phone: &str) -> BackendResult<Vendor> {
        let phone = phone.to_string();
        self.request(|reply| BackendCommand::FindVendorByPhone { phone, reply })
            .await
    }

    pub async fn list_vendors(&self) -> BackendResult<Vec<Vendor>> {
        self.request(|reply| BackendCommand::ListVendors { reply })
            .await
    }

    /// Returns the staff account for `email`, registering it on first use.
    pub async fn staff_sign_in(&self, email: &str, role: Role) -> BackendResult<MfcUser> {
        let email = email.trim().to_lowercase();
        self.request(|reply| BackendCommand::StaffSignIn { email, role, reply })
            .await
    }

    pub async fn list_drivers(&self) -> BackendResult<Vec<MfcUser>> {
        self.request(|reply| BackendCommand::ListDrivers { reply })
            .await
    }

    /// Turns a cart snapshot into a pending order and debits the vendor.
    pub async fn place_order(
        &self,
        vendor_id: &str,
        cart: Cart,
        waste_credits_requested: Money,
    ) -> BackendResult<Order> {
        let vendor_id = vendor_id.to_string();
        self.request(|reply| BackendCommand::PlaceOrder {
            vendor_id,
            cart,
            waste_credits_requested,
            reply,
        })
        .await
    }

    /// Orders matching `filter`, newest first.
    pub async fn list_orders(&self, filter: OrderFilter) -> BackendResult<Vec<Order>> {
        self.request(|reply| BackendCommand::ListOrders { filter, reply })
            .await
    }

    pub async fn update_order_status(
        &self,
        order_id: &str,
        target: OrderStatus,
        driver_id: Option<&str>,
    ) -> BackendResult<Order> {
        let order_id = order_id.to_string();
        let driver_id = driver_id.map(str::to_string);
        self.request(|reply| BackendCommand::UpdateOrderStatus {
            order_id,
            target,
            driver_id,
            reply,
        })
        .await
    }

    /// Delivers an order on behalf of the driver it is assigned to.
    pub async fn mark_delivered(&self, order_id: &str, driver_id: &str) -> BackendResult<Order> {
        let order_id = order_id.to_string();
        let driver_id = driver_id.to_string();
        self.request(|reply| BackendCommand::MarkDelivered {
            order_id,
            driver_id,
            reply,
        })
        .await
    }

    pub async fn log_waste_pickup(
        &self,
        vendor_id: &str,
        driver_id: &str,
        weight: WasteWeight,
    ) -> BackendResult<WastePickup> {
        let vendor_id = vendor_id.to_string();
        let driver_id = driver_id.to_string();
        self.request(|reply| BackendCommand::LogWastePickup {
            vendor_id,
            driver_id,
            weight,
            reply,
        })
        .await
    }

    /// Pickups matching `filter`, newest first.
    pub async fn list_pickups(&self, filter: PickupFilter) -> BackendResult<Vec<WastePickup>> {
        self.request(|reply| BackendCommand::ListPickups { filter, reply })
            .await
    }

    /// The aggregate procurement list over all open orders.
    pub async fn procurement(&self) -> BackendResult<Vec<ProcurementLine>> {
        self.request(|reply| BackendCommand::Procurement { reply })
            .await
    }

    /// Stops the backend task. Later requests fail with `ChannelClosed`.
    pub async fn shutdown(&self) -> BackendResult<()> {
        self.cmd_tx
            .send(BackendCommand::Shutdown)
            .await
            .map_err(|_| BackendError::ChannelClosed)
    }
}
