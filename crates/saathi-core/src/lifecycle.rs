//! # Order Lifecycle
//!
//! Creation of orders from a cart and the forward-only status machine.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Order::from_cart                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌─────────┐ confirm ┌───────────┐ assign(driver) ┌──────────┐        │
//! │   │ pending │────────►│ confirmed │───────────────►│ assigned │        │
//! │   └─────────┘         └───────────┘                └────┬─────┘        │
//! │                                                         │ deliver      │
//! │                                                         ▼              │
//! │                                                   ┌───────────┐        │
//! │                                                   │ delivered │ ■      │
//! │                                                   └───────────┘        │
//! │                                                                         │
//! │   Anything else ──► CoreError::InvalidTransition, order unchanged       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Order, OrderStatus, Vendor};
use crate::validation::validate_driver_id;

impl Order {
    /// Creates a `pending` order from a cart snapshot.
    ///
    /// The total is fixed here; later price changes never touch it. The caller
    /// clears the cart once the order has been accepted. A total outside the
    /// [`Money`] range is `AmountOverflow`.
    pub fn from_cart(
        order_id: impl Into<String>,
        vendor_id: impl Into<String>,
        cart: &Cart,
        waste_credits_used: Money,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<Order> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let total_cost = cart.checked_total_cost().ok_or(CoreError::AmountOverflow)?;

        Ok(Order {
            order_id: order_id.into(),
            vendor_id: vendor_id.into(),
            items: cart.to_order_items(),
            total_cost,
            waste_credits_used,
            status: OrderStatus::Pending,
            timestamp,
            driver_id: None,
        })
    }

    /// Moves the order to `target`.
    ///
    /// `driver_id` is required (and only used) when `target` is
    /// [`OrderStatus::Assigned`]. On any error the order is left untouched.
    pub fn transition_to(&mut self, target: OrderStatus, driver_id: Option<&str>) -> CoreResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(CoreError::InvalidTransition {
                order_id: self.order_id.clone(),
                from: self.status,
                to: target,
            });
        }

        if target == OrderStatus::Assigned {
            let driver_id = driver_id.unwrap_or_default();
            validate_driver_id(driver_id)?;
            self.driver_id = Some(driver_id.trim().to_string());
        }

        self.status = target;
        Ok(())
    }

    /// Manager accepts a pending order.
    pub fn confirm(&mut self) -> CoreResult<()> {
        self.transition_to(OrderStatus::Confirmed, None)
    }

    /// Manager hands a confirmed order to a driver.
    pub fn assign(&mut self, driver_id: &str) -> CoreResult<()> {
        self.transition_to(OrderStatus::Assigned, Some(driver_id))
    }

    /// Marks an assigned order delivered.
    pub fn deliver(&mut self) -> CoreResult<()> {
        self.transition_to(OrderStatus::Delivered, None)
    }

    /// Marks delivered on behalf of a specific driver.
    ///
    /// Only the driver the order was assigned to may deliver it. The status
    /// check runs first so a delivered order always reports
    /// [`CoreError::InvalidTransition`].
    pub fn deliver_by(&mut self, driver_id: &str) -> CoreResult<()> {
        if !self.status.can_transition_to(OrderStatus::Delivered) {
            return self.deliver();
        }

        if self.driver_id.as_deref() != Some(driver_id) {
            return Err(CoreError::NotAssignedDriver {
                order_id: self.order_id.clone(),
                driver_id: driver_id.to_string(),
            });
        }

        self.deliver()
    }

    /// True while the order still needs produce from the MFC.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

// =============================================================================
// Payment Split
// =============================================================================

/// How an order total is covered by the vendor's two balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSplit {
    pub waste_credits: Money,
    pub saathi_credit: Money,
}

impl Vendor {
    /// Works out how `total` would be paid.
    ///
    /// ## Policy
    /// ```text
    /// waste  = min(requested, waste_credits_balance, total)   (never negative)
    /// saathi = total - waste
    /// saathi > saathi_credit_balance  ──► InsufficientCredit
    /// ```
    pub fn plan_payment(&self, total: Money, requested_waste_credits: Money) -> CoreResult<PaymentSplit> {
        let waste_credits = requested_waste_credits
            .min(self.waste_credits_balance)
            .min(total)
            .non_negative();
        let saathi_credit = total - waste_credits;

        if saathi_credit > self.saathi_credit_balance {
            return Err(CoreError::InsufficientCredit {
                available: self.saathi_credit_balance,
                required: saathi_credit,
            });
        }

        Ok(PaymentSplit {
            waste_credits,
            saathi_credit,
        })
    }

    /// Debits both balances for an accepted payment split.
    pub fn apply_payment(&mut self, split: PaymentSplit) {
        self.waste_credits_balance -= split.waste_credits;
        self.saathi_credit_balance -= split.saathi_credit;
    }

    /// Saathi credit already drawn against the limit.
    pub fn saathi_credit_used(&self) -> Money {
        (self.saathi_credit_limit - self.saathi_credit_balance).non_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::error::ValidationError;

    fn cart_with(lines: &[(&str, i64, i64)]) -> Cart {
        let mut cart = Cart::new();
        for (id, rupees, qty) in lines {
            cart.add_item(CartItem {
                product_id: id.to_string(),
                name: id.to_string(),
                quantity: 1,
                unit: "kg".to_string(),
                price: Money::from_rupees(*rupees),
                image_ref: String::new(),
            });
            cart.update_quantity(id, *qty);
        }
        cart
    }

    fn pending_order() -> Order {
        let cart = cart_with(&[("onion", 25, 5), ("tomato", 30, 3)]);
        Order::from_cart("ORD-001", "vendor-1", &cart, Money::zero(), Utc::now()).unwrap()
    }

    fn test_vendor(saathi: i64, waste: i64) -> Vendor {
        Vendor {
            uid: "vendor-1".to_string(),
            name: "Raju".to_string(),
            phone: "9876543210".to_string(),
            stall_name: "Raju's Stall".to_string(),
            saathi_credit_limit: Money::from_rupees(5000),
            saathi_credit_balance: Money::from_rupees(saathi),
            waste_credits_balance: Money::from_rupees(waste),
        }
    }

    #[test]
    fn test_from_cart_fixes_total() {
        let order = pending_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_cost, Money::from_rupees(215));
        assert_eq!(order.items.len(), 2);
        assert!(order.driver_id.is_none());
    }

    #[test]
    fn test_from_empty_cart_rejected() {
        let result = Order::from_cart("ORD-001", "v", &Cart::new(), Money::zero(), Utc::now());
        assert_eq!(result, Err(CoreError::EmptyCart));
    }

    #[test]
    fn test_from_cart_rejects_total_out_of_range() {
        let cart = cart_with(&[("saffron", i64::MAX / 200, 3)]);
        let result = Order::from_cart("ORD-001", "v", &cart, Money::zero(), Utc::now());
        assert_eq!(result, Err(CoreError::AmountOverflow));
    }

    #[test]
    fn test_full_forward_path() {
        let mut order = pending_order();

        order.confirm().unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);

        order.assign("driver-1").unwrap();
        assert_eq!(order.status, OrderStatus::Assigned);
        assert_eq!(order.driver_id.as_deref(), Some("driver-1"));

        order.deliver().unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(!order.is_open());
    }

    #[test]
    fn test_skipping_a_state_is_rejected() {
        let mut order = pending_order();
        let before = order.clone();

        let err = order.assign("driver-1").unwrap_err();

        assert_eq!(
            err,
            CoreError::InvalidTransition {
                order_id: "ORD-001".to_string(),
                from: OrderStatus::Pending,
                to: OrderStatus::Assigned,
            }
        );
        assert_eq!(order, before);
    }

    #[test]
    fn test_delivered_is_terminal() {
        let mut order = pending_order();
        order.confirm().unwrap();
        order.assign("driver-1").unwrap();
        order.deliver().unwrap();

        for target in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Assigned,
            OrderStatus::Delivered,
        ] {
            let result = order.transition_to(target, Some("driver-2"));
            assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
        }
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.driver_id.as_deref(), Some("driver-1"));
    }

    #[test]
    fn test_backward_transition_rejected() {
        let mut order = pending_order();
        order.confirm().unwrap();

        let result = order.transition_to(OrderStatus::Pending, None);
        assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
    }

    #[test]
    fn test_assign_requires_driver() {
        let mut order = pending_order();
        order.confirm().unwrap();

        let result = order.transition_to(OrderStatus::Assigned, None);

        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!(order.driver_id.is_none());
    }

    #[test]
    fn test_deliver_by_checks_driver() {
        let mut order = pending_order();
        order.confirm().unwrap();
        order.assign("driver-1").unwrap();

        let result = order.deliver_by("driver-2");
        assert!(matches!(result, Err(CoreError::NotAssignedDriver { .. })));
        assert_eq!(order.status, OrderStatus::Assigned);

        order.deliver_by("driver-1").unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_deliver_by_on_pending_is_invalid_transition() {
        let mut order = pending_order();
        let result = order.deliver_by("driver-1");
        assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
    }

    #[test]
    fn test_payment_uses_waste_credits_first() {
        let vendor = test_vendor(2500, 180);

        let split = vendor
            .plan_payment(Money::from_rupees(215), Money::from_rupees(500))
            .unwrap();

        assert_eq!(split.waste_credits, Money::from_rupees(180));
        assert_eq!(split.saathi_credit, Money::from_rupees(35));
    }

    #[test]
    fn test_payment_caps_waste_credits_at_total() {
        let vendor = test_vendor(0, 1000);

        let split = vendor
            .plan_payment(Money::from_rupees(215), Money::from_rupees(1000))
            .unwrap();

        assert_eq!(split.waste_credits, Money::from_rupees(215));
        assert!(split.saathi_credit.is_zero());
    }

    #[test]
    fn test_payment_insufficient_credit() {
        let vendor = test_vendor(100, 0);

        let err = vendor
            .plan_payment(Money::from_rupees(215), Money::zero())
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientCredit {
                available: Money::from_rupees(100),
                required: Money::from_rupees(215),
            }
        );
    }

    #[test]
    fn test_apply_payment_debits_balances() {
        let mut vendor = test_vendor(2500, 180);
        let split = vendor
            .plan_payment(Money::from_rupees(215), Money::from_rupees(15))
            .unwrap();

        vendor.apply_payment(split);

        assert_eq!(vendor.waste_credits_balance, Money::from_rupees(165));
        assert_eq!(vendor.saathi_credit_balance, Money::from_rupees(2300));
        assert_eq!(vendor.saathi_credit_used(), Money::from_rupees(2700));
    }
}
