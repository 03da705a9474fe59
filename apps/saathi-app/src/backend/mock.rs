//! # Mock Backend
//!
//! In-memory backend-of-record running as a single tokio task.
//!
//! ## Demo Data
//! ```text
//! vendor1  राजू कुमार   राजू के छोले भटूरे   saathi ₹2500 / ₹5000   waste ₹180
//! vendor2  सुनीता देवी  सुनीता की चाट       saathi ₹3200 / ₹5000   waste ₹95
//! vendor3  मोहन सिंह    मोहन के समोसे       saathi ₹1800 / ₹3000   waste ₹240
//!
//! ORD-001  vendor1  pending    प्याज 5 kg, टमाटर 3 kg        ₹215
//! ORD-002  vendor2  confirmed  आलू 10 kg, हरी सब्जी 2 bundle  ₹210
//!
//! manager@mfc.com  (manager)     driver@mfc.com  (driver)
//! ```

use std::time::Duration;

use chrono::Utc;
use saathi_core::procurement;
use saathi_core::waste::log_pickup;
use saathi_core::{
    Cart, CoreError, CoreResult, MfcUser, Money, Order, OrderItem, OrderStatus, ProcurementLine,
    Role, Vendor, WastePickup, WasteWeight,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BackendCommand, BackendHandle, OrderFilter, PickupFilter, Reply};
use crate::config::AppConfig;

/// Command channel capacity.
const COMMAND_BUFFER: usize = 64;

/// The in-memory backend actor.
#[derive(Debug)]
pub struct MockBackend {
    latency: Duration,
    waste_rate: Money,
    vendors: Vec<Vendor>,
    staff: Vec<MfcUser>,
    /// Insertion order; listings reverse it.
    orders: Vec<Order>,
    pickups: Vec<WastePickup>,
    next_order_seq: u32,
}

impl MockBackend {
    /// Creates an empty backend.
    pub fn new(config: &AppConfig) -> Self {
        MockBackend {
            latency: config.backend_latency(),
            waste_rate: config.waste_rate(),
            vendors: Vec::new(),
            staff: Vec::new(),
            orders: Vec::new(),
            pickups: Vec::new(),
            next_order_seq: 1,
        }
    }

    /// Creates a backend, seeded with demo data when the config asks for it.
    pub fn from_config(config: &AppConfig) -> Self {
        let backend = Self::new(config);
        if config.demo.seed_data {
            backend.with_demo_data()
        } else {
            backend
        }
    }

    /// Adds the demo vendors, staff accounts and two open orders.
    pub fn with_demo_data(mut self) -> Self {
        self.vendors = vec![
            vendor("vendor1", "राजू कुमार", "9876543210", "राजू के छोले भटूरे", 5000, 2500, 180),
            vendor("vendor2", "सुनीता देवी", "9876543211", "सुनीता की चाट", 5000, 3200, 95),
            vendor("vendor3", "मोहन सिंह", "9876543212", "मोहन के समोसे", 3000, 1800, 240),
        ];

        self.staff = vec![
            staff("MFC Manager", "manager@mfc.com", Role::Manager),
            staff("Demo Driver", "driver@mfc.com", Role::Driver),
        ];

        let seeded = [
            (
                "vendor1",
                OrderStatus::Pending,
                vec![item("1", "प्याज", 5, "kg", 25), item("3", "टमाटर", 3, "kg", 30)],
            ),
            (
                "vendor2",
                OrderStatus::Confirmed,
                vec![item("2", "आलू", 10, "kg", 18), item("4", "हरी सब्जी", 2, "bundle", 15)],
            ),
        ];

        for (vendor_id, status, items) in seeded {
            let order_id = self.allocate_order_id();
            self.orders.push(Order {
                order_id,
                vendor_id: vendor_id.to_string(),
                total_cost: items.iter().map(OrderItem::line_total).sum(),
                items,
                waste_credits_used: Money::zero(),
                status,
                timestamp: Utc::now(),
                driver_id: None,
            });
        }

        self
    }

    /// Spawns the actor and returns a handle to it.
    pub fn start(self) -> BackendHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        BackendHandle::new(cmd_tx)
    }

    /// Main actor loop.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<BackendCommand>) {
        info!(
            vendors = self.vendors.len(),
            orders = self.orders.len(),
            latency_ms = self.latency.as_millis() as u64,
            "Mock backend started"
        );

        while let Some(cmd) = cmd_rx.recv().await {
            if let BackendCommand::Shutdown = cmd {
                info!("Mock backend shutting down");
                break;
            }

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            self.dispatch(cmd);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::GetVendor { vendor_id, reply } => {
                respond(reply, self.vendor(&vendor_id).cloned());
            }
            BackendCommand::FindVendorByPhone { phone, reply } => {
                let found = self
                    .vendors
                    .iter()
                    .find(|v| v.phone == phone)
                    .cloned()
                    .ok_or(CoreError::VendorNotFound(phone));
                respond(reply, found);
            }
            BackendCommand::ListVendors { reply } => {
                respond(reply, Ok(self.vendors.clone()));
            }
            BackendCommand::StaffSignIn { email, role, reply } => {
                respond(reply, Ok(self.staff_sign_in(email, role)));
            }
            BackendCommand::ListDrivers { reply } => {
                let drivers = self
                    .staff
                    .iter()
                    .filter(|u| u.role == Role::Driver)
                    .cloned()
                    .collect();
                respond(reply, Ok(drivers));
            }
            BackendCommand::PlaceOrder {
                vendor_id,
                cart,
                waste_credits_requested,
                reply,
            } => {
                respond(reply, self.place_order(&vendor_id, &cart, waste_credits_requested));
            }
            BackendCommand::ListOrders { filter, reply } => {
                respond(reply, Ok(self.list_orders(&filter)));
            }
            BackendCommand::UpdateOrderStatus {
                order_id,
                target,
                driver_id,
                reply,
            } => {
                let result = self.order_mut(&order_id).and_then(|order| {
                    order.transition_to(target, driver_id.as_deref())?;
                    Ok(order.clone())
                });
                if let Ok(order) = &result {
                    info!(order_id = %order.order_id, status = %order.status, "Order status updated");
                }
                respond(reply, result);
            }
            BackendCommand::MarkDelivered {
                order_id,
                driver_id,
                reply,
            } => {
                let result = self.order_mut(&order_id).and_then(|order| {
                    order.deliver_by(&driver_id)?;
                    Ok(order.clone())
                });
                if result.is_ok() {
                    info!(%order_id, %driver_id, "Order delivered");
                }
                respond(reply, result);
            }
            BackendCommand::LogWastePickup {
                vendor_id,
                driver_id,
                weight,
                reply,
            } => {
                respond(reply, self.log_waste_pickup(&vendor_id, &driver_id, weight));
            }
            BackendCommand::ListPickups { filter, reply } => {
                respond(reply, Ok(self.list_pickups(&filter)));
            }
            BackendCommand::Procurement { reply } => {
                respond(reply, Ok(self.procurement()));
            }
            BackendCommand::Shutdown => {}
        }
    }

    // =========================================================================
    // Vendors & Staff
    // =========================================================================

    fn vendor(&self, vendor_id: &str) -> CoreResult<&Vendor> {
        self.vendors
            .iter()
            .find(|v| v.uid == vendor_id)
            .ok_or_else(|| CoreError::VendorNotFound(vendor_id.to_string()))
    }

    fn vendor_mut(&mut self, vendor_id: &str) -> CoreResult<&mut Vendor> {
        self.vendors
            .iter_mut()
            .find(|v| v.uid == vendor_id)
            .ok_or_else(|| CoreError::VendorNotFound(vendor_id.to_string()))
    }

    fn staff_sign_in(&mut self, email: String, role: Role) -> MfcUser {
        if let Some(user) = self.staff.iter().find(|u| u.email == email && u.role == role) {
            return user.clone();
        }

        let name = email.split('@').next().unwrap_or_default().to_string();
        let user = staff(&name, &email, role);
        info!(uid = %user.uid, %email, %role, "Registered staff account");
        self.staff.push(user.clone());
        user
    }

    // =========================================================================
    // Orders
    // =========================================================================

    fn allocate_order_id(&mut self) -> String {
        let id = format_order_id(self.next_order_seq);
        self.next_order_seq += 1;
        id
    }

    fn order_mut(&mut self, order_id: &str) -> CoreResult<&mut Order> {
        self.orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))
    }

    /// Places an order and debits the vendor.
    ///
    /// Nothing changes unless the whole operation succeeds: the id counter,
    /// the order list and both balances are only touched at the end.
    fn place_order(
        &mut self,
        vendor_id: &str,
        cart: &Cart,
        waste_credits_requested: Money,
    ) -> CoreResult<Order> {
        let order_id = format_order_id(self.next_order_seq);
        let vendor = self.vendor_mut(vendor_id)?;

        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = cart.checked_total_cost().ok_or(CoreError::AmountOverflow)?;
        let split = vendor
            .plan_payment(total, waste_credits_requested)
            .inspect_err(|e| warn!(vendor_id, error = %e, "Order rejected"))?;
        let order = Order::from_cart(order_id, vendor_id, cart, split.waste_credits, Utc::now())?;

        vendor.apply_payment(split);
        self.next_order_seq += 1;
        self.orders.push(order.clone());

        info!(
            order_id = %order.order_id,
            vendor_id,
            total = %order.total_cost,
            waste_credits = %split.waste_credits,
            saathi_credit = %split.saathi_credit,
            "Order placed"
        );

        Ok(order)
    }

    fn list_orders(&self, filter: &OrderFilter) -> Vec<Order> {
        self.orders
            .iter()
            .rev()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect()
    }

    fn procurement(&self) -> Vec<ProcurementLine> {
        procurement::aggregate(&self.orders)
    }

    // =========================================================================
    // Waste Pickups
    // =========================================================================

    fn log_waste_pickup(
        &mut self,
        vendor_id: &str,
        driver_id: &str,
        weight: WasteWeight,
    ) -> CoreResult<WastePickup> {
        let rate = self.waste_rate;
        let vendor = self.vendor_mut(vendor_id)?;
        let pickup = log_pickup(vendor, driver_id, weight, rate, Utc::now())?;

        info!(
            pickup_id = %pickup.pickup_id,
            vendor_id,
            driver_id,
            weight = %pickup.weight,
            credits = %pickup.credits_earned,
            "Waste pickup logged"
        );

        self.pickups.push(pickup.clone());
        Ok(pickup)
    }

    fn list_pickups(&self, filter: &PickupFilter) -> Vec<WastePickup> {
        self.pickups
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }
}

/// Sends a reply; a requester that stopped waiting is not an error.
fn respond<T>(reply: Reply<T>, result: CoreResult<T>) {
    if reply.send(result).is_err() {
        debug!("Backend requester dropped before reply");
    }
}

/// `ORD-001`, `ORD-042`, `ORD-1234`.
fn format_order_id(seq: u32) -> String {
    format!("ORD-{:03}", seq)
}

fn vendor(
    uid: &str,
    name: &str,
    phone: &str,
    stall_name: &str,
    limit: i64,
    saathi: i64,
    waste: i64,
) -> Vendor {
    Vendor {
        uid: uid.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        stall_name: stall_name.to_string(),
        saathi_credit_limit: Money::from_rupees(limit),
        saathi_credit_balance: Money::from_rupees(saathi),
        waste_credits_balance: Money::from_rupees(waste),
    }
}

fn staff(name: &str, email: &str, role: Role) -> MfcUser {
    MfcUser {
        uid: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
    }
}

fn item(product_id: &str, name: &str, quantity: i64, unit: &str, rupees: i64) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        price: Money::from_rupees(rupees),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use saathi_core::Catalog;

    fn demo_backend() -> BackendHandle {
        MockBackend::from_config(&AppConfig::for_tests()).start()
    }

    fn cart(lines: &[(&str, i64)]) -> Cart {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        for (id, qty) in lines {
            cart.add_product(catalog.get(id).unwrap());
            cart.update_quantity(id, *qty);
        }
        cart
    }

    #[test]
    fn test_format_order_id() {
        assert_eq!(format_order_id(1), "ORD-001");
        assert_eq!(format_order_id(42), "ORD-042");
        assert_eq!(format_order_id(1234), "ORD-1234");
    }

    #[tokio::test]
    async fn test_seed_data() {
        let backend = demo_backend();

        let orders = backend.list_orders(OrderFilter::all()).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, "ORD-002");
        assert_eq!(orders[1].total_cost, Money::from_rupees(215));
        assert_eq!(orders[0].total_cost, Money::from_rupees(210));

        let raju = backend.find_vendor_by_phone("9876543210").await.unwrap();
        assert_eq!(raju.uid, "vendor1");
        assert_eq!(raju.waste_credits_balance, Money::from_rupees(180));

        assert_eq!(backend.list_drivers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unseeded_backend_is_empty() {
        let mut config = AppConfig::for_tests();
        config.demo.seed_data = false;
        let backend = MockBackend::from_config(&config).start();

        assert!(backend.list_vendors().await.unwrap().is_empty());
        assert!(backend.procurement().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_debits_vendor() {
        let backend = demo_backend();

        let order = backend
            .place_order("vendor1", cart(&[("1", 2), ("2", 1)]), Money::from_rupees(20))
            .await
            .unwrap();

        assert_eq!(order.order_id, "ORD-003");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_cost, Money::from_rupees(68));
        assert_eq!(order.waste_credits_used, Money::from_rupees(20));

        let raju = backend.get_vendor("vendor1").await.unwrap();
        assert_eq!(raju.waste_credits_balance, Money::from_rupees(160));
        assert_eq!(raju.saathi_credit_balance, Money::from_rupees(2452));
    }

    #[tokio::test]
    async fn test_rejected_order_changes_nothing() {
        let backend = demo_backend();
        let before = backend.get_vendor("vendor3").await.unwrap();

        // 100 kg of tomatoes is ₹3000, more than ₹1800 + ₹240
        let result = backend
            .place_order("vendor3", cart(&[("3", 100)]), Money::from_rupees(240))
            .await;
        assert!(matches!(
            result,
            Err(BackendError::Core(CoreError::InsufficientCredit { .. }))
        ));

        let empty = backend.place_order("vendor3", Cart::new(), Money::zero()).await;
        assert!(matches!(empty, Err(BackendError::Core(CoreError::EmptyCart))));

        assert_eq!(backend.get_vendor("vendor3").await.unwrap(), before);

        // The failed attempts did not burn an order number
        let order = backend
            .place_order("vendor3", cart(&[("4", 1)]), Money::zero())
            .await
            .unwrap();
        assert_eq!(order.order_id, "ORD-003");
    }

    #[tokio::test]
    async fn test_status_updates() {
        let backend = demo_backend();

        let err = backend
            .update_order_status("ORD-001", OrderStatus::Assigned, Some("driver-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Core(CoreError::InvalidTransition { .. })));

        let missing = backend
            .update_order_status("ORD-999", OrderStatus::Confirmed, None)
            .await
            .unwrap_err();
        assert!(matches!(missing, BackendError::Core(CoreError::OrderNotFound(_))));

        let order = backend
            .update_order_status("ORD-002", OrderStatus::Assigned, Some("driver-1"))
            .await
            .unwrap();
        assert_eq!(order.driver_id.as_deref(), Some("driver-1"));

        let delivered = backend.mark_delivered("ORD-002", "driver-1").await.unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);

        let procurement = backend.procurement().await.unwrap();
        assert!(procurement.iter().all(|line| line.name != "आलू"));
    }

    #[tokio::test]
    async fn test_waste_pickup_ledger() {
        let backend = demo_backend();

        let pickup = backend
            .log_waste_pickup("vendor2", "driver-1", WasteWeight::from_grams(3500))
            .await
            .unwrap();
        assert_eq!(pickup.credits_earned, Money::from_paise(1750));

        let rejected = backend
            .log_waste_pickup("vendor2", "driver-1", WasteWeight::from_grams(0))
            .await;
        assert!(rejected.is_err());

        let unknown = backend
            .log_waste_pickup("vendor9", "driver-1", WasteWeight::from_grams(1000))
            .await;
        assert!(matches!(
            unknown,
            Err(BackendError::Core(CoreError::VendorNotFound(_)))
        ));

        let sunita = backend.get_vendor("vendor2").await.unwrap();
        assert_eq!(
            sunita.waste_credits_balance,
            Money::from_rupees(95) + Money::from_paise(1750)
        );

        let ledger = backend
            .list_pickups(PickupFilter::for_vendor("vendor2"))
            .await
            .unwrap();
        assert_eq!(ledger, vec![pickup]);
    }

    #[tokio::test]
    async fn test_out_of_range_amounts_keep_backend_alive() {
        let backend = demo_backend();

        let mut huge = cart(&[("1", 1)]);
        huge.add_item(saathi_core::CartItem {
            product_id: "bulk".to_string(),
            name: "bulk".to_string(),
            quantity: 1,
            unit: "kg".to_string(),
            price: Money::from_paise(i64::MAX / 2),
            image_ref: String::new(),
        });
        huge.update_quantity("bulk", 3);

        let result = backend.place_order("vendor1", huge, Money::zero()).await;
        assert!(matches!(
            result,
            Err(BackendError::Core(CoreError::AmountOverflow))
        ));

        let result = backend
            .log_waste_pickup("vendor1", "driver-1", WasteWeight::from_grams(i64::MAX))
            .await;
        assert!(matches!(result, Err(BackendError::Core(CoreError::Validation(_)))));

        let raju = backend.get_vendor("vendor1").await.unwrap();
        assert_eq!(raju.waste_credits_balance, Money::from_rupees(180));
        assert_eq!(raju.saathi_credit_balance, Money::from_rupees(2500));
        assert_eq!(backend.list_orders(OrderFilter::all()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_staff_sign_in_is_stable() {
        let backend = demo_backend();

        let first = backend.staff_sign_in("Manager@MFC.com", Role::Manager).await.unwrap();
        let second = backend.staff_sign_in("manager@mfc.com", Role::Manager).await.unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(first.name, "MFC Manager");

        let new_driver = backend.staff_sign_in("driver2@mfc.com", Role::Driver).await.unwrap();
        assert_eq!(new_driver.name, "driver2");
        assert_eq!(backend.list_drivers().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_closes_channel() {
        let backend = demo_backend();
        backend.shutdown().await.unwrap();

        // The actor drops its receiver once the loop exits
        tokio::task::yield_now().await;
        let result = backend.list_vendors().await;
        assert!(matches!(result, Err(BackendError::ChannelClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let mut config = AppConfig::for_tests();
        config.simulation.backend_latency_ms = 300;
        let backend = MockBackend::from_config(&config).start();

        let started = tokio::time::Instant::now();
        backend.list_vendors().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
