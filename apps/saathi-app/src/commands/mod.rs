//! # Commands Module
//!
//! Dashboard operations, grouped by the role that performs them.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dashboard Commands                                   │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │  VENDOR                                                       │     │
//! │  │  vendor_home, get_cart, add_to_cart, update_cart_item,        │     │
//! │  │  remove_from_cart, clear_cart, place_order, order_history     │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │  MANAGER                                                      │     │
//! │  │  manager_dashboard, update_order_status, confirm_order,       │     │
//! │  │  assign_driver, procurement_list                              │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │  DRIVER                                                       │     │
//! │  │  driver_dashboard, mark_delivered, log_waste_pickup           │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Command Pattern
//! ```rust,ignore
//! pub async fn command_name(
//!     state: &AppState,            // shared config, catalog, backend, notifier
//!     session: &RoleSession,       // who is asking
//!     arg: Type,
//! ) -> Result<ViewModel, ApiError> {
//!     // 1. Validate input
//!     // 2. Call the backend / core
//!     // 3. Notify (success or destructive)
//!     // 4. Return a serializable view model
//! }
//! ```
//!
//! Cart edits stay silent; everything that reaches the backend reports its
//! outcome on the notification sink.

pub mod driver;
pub mod manager;
pub mod vendor;

use tracing::warn;

use crate::error::ApiError;
use crate::notify::Notifier;

/// Returns an `inspect_err` callback that logs the error and sends it as a
/// destructive notification titled `title`.
pub(crate) fn notify_failure<'a>(
    notifier: &'a Notifier,
    title: &'a str,
) -> impl FnOnce(&ApiError) + 'a {
    move |err| {
        warn!(code = ?err.code, error = %err, title, "Command failed");
        notifier.destructive(title, err.message.clone());
    }
}
