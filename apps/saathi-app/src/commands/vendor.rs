//! # Vendor Commands
//!
//! Home, cart and order history for a logged-in street vendor.
//!
//! ## Ordering Flow
//! ```text
//! ┌──────────┐ add_to_cart ┌──────────┐ place_order ┌─────────────────┐
//! │  Empty   │────────────►│ In Cart  │────────────►│ ORD-NNN pending │
//! │  Cart    │◄────────────│          │             └─────────────────┘
//! └──────────┘ clear_cart  └──────────┘                     │
//!      ▲                                                     │
//!      └──────────── cart cleared on success ────────────────┘
//! ```

use saathi_core::{Cart, CartItem, CartTotals, Money, Order, Product, Vendor, WastePickup};
use serde::Serialize;
use tracing::{debug, info};

use super::notify_failure;
use crate::backend::{OrderFilter, PickupFilter};
use crate::error::ApiError;
use crate::state::{AppState, VendorSession};

// =============================================================================
// View Models
// =============================================================================

/// Cart contents with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// The vendor's landing screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorHome {
    pub vendor: Vendor,
    pub saathi_credit_used: Money,
    pub catalog: Vec<Product>,
    pub cart: CartTotals,
}

/// Past orders and the waste credits the vendor has earned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    pub orders: Vec<Order>,
    pub pickups: Vec<WastePickup>,
    pub total_waste_credits_earned: Money,
}

// =============================================================================
// Commands
// =============================================================================

/// Profile, balances, catalog and cart badge.
pub async fn vendor_home(state: &AppState, session: &VendorSession) -> Result<VendorHome, ApiError> {
    let vendor = state.backend.get_vendor(session.vendor_id()).await?;

    Ok(VendorHome {
        saathi_credit_used: vendor.saathi_credit_used(),
        vendor,
        catalog: state.catalog.products().to_vec(),
        cart: session.cart().with_cart(|c| CartTotals::from(c)),
    })
}

pub fn get_cart(session: &VendorSession) -> CartResponse {
    session.cart().with_cart(|c| CartResponse::from(c))
}

/// Adds one unit of a catalog product.
pub fn add_to_cart(
    state: &AppState,
    session: &VendorSession,
    product_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, "add_to_cart command");

    let product = state
        .catalog
        .get(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))
        .inspect_err(notify_failure(&state.notifier, "त्रुटि"))?;

    let response = session.cart().with_cart_mut(|cart| {
        cart.add_product(product);
        CartResponse::from(&*cart)
    });

    state.notifier.success(
        "कार्ट में जोड़ा गया",
        format!("{} आपके कार्ट में जोड़ दिया गया है।", product.name),
    );

    Ok(response)
}

/// Sets a line's quantity; zero or less removes it.
pub fn update_cart_item(session: &VendorSession, product_id: &str, quantity: i64) -> CartResponse {
    debug!(product_id, quantity, "update_cart_item command");
    session.cart().with_cart_mut(|cart| {
        cart.update_quantity(product_id, quantity);
        CartResponse::from(&*cart)
    })
}

pub fn remove_from_cart(session: &VendorSession, product_id: &str) -> CartResponse {
    debug!(product_id, "remove_from_cart command");
    session.cart().with_cart_mut(|cart| {
        cart.remove_item(product_id);
        CartResponse::from(&*cart)
    })
}

pub fn clear_cart(session: &VendorSession) -> CartResponse {
    debug!("clear_cart command");
    session.cart().with_cart_mut(|cart| {
        cart.clear();
        CartResponse::from(&*cart)
    })
}

/// Sends the cart to the MFC as a new order.
///
/// Up to `waste_credits_requested` is paid from waste credits, the rest from
/// Saathi credit. Once the backend accepts the order its lines leave the cart;
/// anything added while the request was in flight stays.
pub async fn place_order(
    state: &AppState,
    session: &VendorSession,
    waste_credits_requested: Money,
) -> Result<Order, ApiError> {
    let cart = session.cart().snapshot();
    debug!(
        vendor_id = session.vendor_id(),
        lines = cart.line_count(),
        total = %cart.total_cost(),
        "place_order command"
    );

    let order = state
        .backend
        .place_order(session.vendor_id(), cart, waste_credits_requested)
        .await
        .map_err(ApiError::from)
        .inspect_err(notify_failure(&state.notifier, "ऑर्डर विफल"))?;

    session.cart().with_cart_mut(|cart| cart.remove_ordered(&order.items));

    info!(order_id = %order.order_id, vendor_id = session.vendor_id(), "Order placed by vendor");
    state.notifier.success(
        "ऑर्डर भेजा गया",
        format!("ऑर्डर {} ({}) MFC को भेज दिया गया है।", order.order_id, order.total_cost),
    );

    Ok(order)
}

/// The vendor's orders and waste pickups, newest first.
pub async fn order_history(
    state: &AppState,
    session: &VendorSession,
) -> Result<OrderHistory, ApiError> {
    let orders = state
        .backend
        .list_orders(OrderFilter::for_vendor(session.vendor_id()))
        .await?;
    let pickups = state
        .backend
        .list_pickups(PickupFilter::for_vendor(session.vendor_id()))
        .await?;

    Ok(OrderHistory {
        total_waste_credits_earned: pickups.iter().map(|p| p.credits_earned).sum(),
        orders,
        pickups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use crate::notify::Severity;
    use saathi_core::OrderStatus;

    fn raju() -> VendorSession {
        VendorSession::new("vendor1")
    }

    #[tokio::test]
    async fn test_cart_commands() {
        let (state, mut feed) = AppState::start(AppConfig::for_tests());
        let session = raju();

        add_to_cart(&state, &session, "1").unwrap();
        add_to_cart(&state, &session, "1").unwrap();
        let cart = add_to_cart(&state, &session, "4").unwrap();

        assert_eq!(cart.totals.line_count, 2);
        assert_eq!(cart.totals.item_count, 3);
        assert_eq!(cart.totals.total_cost, Money::from_rupees(65));

        let cart = update_cart_item(&session, "1", 0);
        assert_eq!(cart.totals.item_count, 1);

        let cart = remove_from_cart(&session, "4");
        assert!(cart.items.is_empty());

        assert_eq!(feed.drain().len(), 3);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let (state, mut feed) = AppState::start(AppConfig::for_tests());

        let err = add_to_cart(&state, &raju(), "99").unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(feed.drain()[0].severity, Severity::Destructive);
        assert!(get_cart(&raju()).items.is_empty());
    }

    #[tokio::test]
    async fn test_place_order_clears_cart() {
        let (state, _feed) = AppState::start(AppConfig::for_tests());
        let session = raju();
        add_to_cart(&state, &session, "2").unwrap();
        add_to_cart(&state, &session, "2").unwrap();

        let order = place_order(&state, &session, Money::zero()).await.unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_cost, Money::from_rupees(36));
        assert!(get_cart(&session).items.is_empty());

        let home = vendor_home(&state, &session).await.unwrap();
        assert_eq!(home.vendor.saathi_credit_balance, Money::from_rupees(2464));
        assert_eq!(home.saathi_credit_used, Money::from_rupees(2536));
        assert_eq!(home.catalog.len(), 4);
        assert_eq!(home.cart.item_count, 0);

        let history = order_history(&state, &session).await.unwrap();
        assert_eq!(history.orders[0].order_id, order.order_id);
        assert_eq!(history.orders.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_order_keeps_cart() {
        let (state, _feed) = AppState::start(AppConfig::for_tests());
        let session = raju();

        let err = place_order(&state, &session, Money::zero()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        session.cart().with_cart_mut(|cart| {
            cart.add_product(state.catalog.get("3").unwrap());
            cart.update_quantity("3", 200);
        });

        let err = place_order(&state, &session, Money::zero()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientCredit);
        assert_eq!(get_cart(&session).totals.item_count, 200);
    }

    #[tokio::test]
    async fn test_huge_quantity_is_capped_before_ordering() {
        let (state, _feed) = AppState::start(AppConfig::for_tests());
        let session = raju();
        add_to_cart(&state, &session, "1").unwrap();

        let cart = update_cart_item(&session, "1", i64::MAX / 1000);
        assert_eq!(cart.totals.item_count, saathi_core::MAX_LINE_QUANTITY);
        assert_eq!(cart.totals.total_cost, Money::from_rupees(25_000));

        let err = place_order(&state, &session, Money::zero()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientCredit);

        let home = vendor_home(&state, &session).await.unwrap();
        assert_eq!(home.vendor.saathi_credit_balance, Money::from_rupees(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lines_added_while_ordering_survive() {
        let mut config = AppConfig::for_tests();
        config.simulation.backend_latency_ms = 100;
        let (state, _feed) = AppState::start(config);
        let session = raju();
        let other_tab = session.clone();

        add_to_cart(&state, &session, "2").unwrap();
        add_to_cart(&state, &session, "2").unwrap();

        let placing = place_order(&state, &session, Money::zero());
        let adding = async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            add_to_cart(&state, &other_tab, "2").unwrap();
            add_to_cart(&state, &other_tab, "4").unwrap();
        };
        let (order, ()) = tokio::join!(placing, adding);

        let order = order.unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);

        let cart = get_cart(&session);
        let lines: Vec<(&str, i64)> = cart
            .items
            .iter()
            .map(|i| (i.product_id.as_str(), i.quantity))
            .collect();
        assert_eq!(lines, vec![("2", 1), ("4", 1)]);
    }
}
