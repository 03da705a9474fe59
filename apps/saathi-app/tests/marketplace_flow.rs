//! End-to-end flows across the three dashboards.

use std::time::Duration;

use saathi_app::auth;
use saathi_app::commands::{driver, manager, vendor};
use saathi_app::config::AppConfig;
use saathi_app::error::ErrorCode;
use saathi_app::state::{AppState, Session};
use saathi_core::{Money, OrderStatus, Role};

async fn vendor_login(state: &AppState, phone: &str) -> Session {
    let challenge = auth::send_otp(state, phone).await.unwrap();
    auth::verify_otp(state, &challenge, "654321").await.unwrap()
}

#[tokio::test]
async fn order_travels_from_cart_to_delivery() {
    let (state, mut feed) = AppState::start(AppConfig::for_tests());

    let vendor_session = vendor_login(&state, "98765-43211").await;
    let sunita = vendor_session.as_vendor().unwrap();
    assert_eq!(sunita.vendor_id(), "vendor2");

    vendor::add_to_cart(&state, sunita, "2").unwrap();
    vendor::add_to_cart(&state, sunita, "2").unwrap();
    vendor::add_to_cart(&state, sunita, "4").unwrap();
    let order = vendor::place_order(&state, sunita, Money::from_rupees(100))
        .await
        .unwrap();

    // 2 kg potatoes + 1 bundle greens = ₹51, fully covered by waste credits
    assert_eq!(order.total_cost, Money::from_rupees(51));
    assert_eq!(order.waste_credits_used, Money::from_rupees(51));
    assert!(vendor::get_cart(sunita).items.is_empty());

    let manager_session = auth::mfc_login(&state, "manager@mfc.com", "demo123")
        .await
        .unwrap();
    let mfc = manager_session.as_manager().unwrap();

    let dashboard = manager::manager_dashboard(&state, mfc).await.unwrap();
    assert_eq!(dashboard.orders[0].order_id, order.order_id);
    assert_eq!(dashboard.stats.pending, 2);
    assert_eq!(dashboard.stats.total_revenue, Money::from_rupees(215 + 210 + 51));

    // ORD-002 already has आलू 10 kg
    let potatoes = dashboard
        .procurement
        .iter()
        .find(|line| line.name == "आलू")
        .unwrap();
    assert_eq!(potatoes.total_quantity, 12);

    let mut driver_session = auth::mfc_login(&state, "driver@mfc.com", "demo123")
        .await
        .unwrap();
    let driver_id = driver_session.user_id().to_string();

    manager::confirm_order(&state, mfc, &order.order_id).await.unwrap();
    manager::assign_driver(&state, mfc, &order.order_id, &driver_id)
        .await
        .unwrap();

    let courier = driver_session.as_driver_mut().unwrap();
    let route = driver::driver_dashboard(&state, courier).await.unwrap();
    assert_eq!(route.assigned_count, 1);
    assert_eq!(route.deliveries[0].stall_name, "सुनीता की चाट");

    let delivered = driver::mark_delivered(&state, courier, &order.order_id)
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    let err = manager::confirm_order(&state, mfc, &order.order_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    let history = vendor::order_history(&state, sunita).await.unwrap();
    assert_eq!(history.orders[0].status, OrderStatus::Delivered);

    let home = vendor::vendor_home(&state, sunita).await.unwrap();
    assert_eq!(home.vendor.waste_credits_balance, Money::from_rupees(44));
    assert_eq!(home.vendor.saathi_credit_balance, Money::from_rupees(3200));

    let failures = feed
        .drain()
        .into_iter()
        .filter(|n| n.title == "Order Update Failed")
        .count();
    assert_eq!(failures, 1);
}

#[tokio::test]
async fn insufficient_credit_leaves_cart_and_balances() {
    let (state, _feed) = AppState::start(AppConfig::for_tests());

    let session = vendor_login(&state, "9876543212").await;
    let mohan = session.as_vendor().unwrap();
    let before = vendor::vendor_home(&state, mohan).await.unwrap().vendor;

    vendor::add_to_cart(&state, mohan, "3").unwrap();
    vendor::update_cart_item(mohan, "3", 80);

    let err = vendor::place_order(&state, mohan, Money::zero()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientCredit);

    assert_eq!(vendor::get_cart(mohan).totals.item_count, 80);
    let after = vendor::vendor_home(&state, mohan).await.unwrap().vendor;
    assert_eq!(after, before);

    // Spending all waste credits brings the remainder within reach
    vendor::update_cart_item(mohan, "3", 60);
    let order = vendor::place_order(&state, mohan, Money::from_rupees(240))
        .await
        .unwrap();
    assert_eq!(order.saathi_credit_used(), Money::from_rupees(1560));
}

#[tokio::test]
async fn login_surfaces_pick_the_session() {
    let (state, _feed) = AppState::start(AppConfig::for_tests());

    let challenge = auth::send_otp(&state, "+91 98765 43210").await.unwrap();
    let err = auth::verify_otp(&state, &challenge, "1234").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let manager = auth::mfc_login(&state, "ops.manager@mfc.com", "x").await.unwrap();
    assert_eq!(manager.role(), Role::Manager);

    let driver = auth::mfc_login(&state, "driver@mfc.com", "x").await.unwrap();
    assert_eq!(driver.role(), Role::Driver);

    let err = auth::mfc_login(&state, "visitor@mfc.com", "x").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);

    let vendor = auth::demo_login(&state, Role::Vendor).await.unwrap();
    assert_eq!(vendor.user_id(), "vendor1");
}

#[tokio::test(start_paused = true)]
async fn waste_pickup_notifies_vendor_after_delay() {
    let (state, mut feed) = AppState::start(AppConfig::default());

    let mut session = auth::demo_login(&state, Role::Driver).await.unwrap();
    feed.drain();

    let courier = session.as_driver_mut().unwrap();
    driver::log_waste_pickup(&state, courier, "vendor3", "12")
        .await
        .unwrap();
    assert_eq!(courier.pending_notifications(), 1);

    let first = feed.recv().await.unwrap();
    assert_eq!(first.title, "🌱 Waste Pickup Logged Successfully!");

    let started = tokio::time::Instant::now();
    let second = feed.recv().await.unwrap();
    assert_eq!(second.title, "Vendor Notification Sent");
    assert_eq!(
        second.message,
        "मोहन सिंह has been notified about their new waste credits!"
    );
    assert!(started.elapsed() >= Duration::from_millis(1900));

    let home_credit = state.backend.get_vendor("vendor3").await.unwrap();
    assert_eq!(home_credit.waste_credits_balance, Money::from_rupees(300));
}

#[tokio::test(start_paused = true)]
async fn logout_cancels_pending_vendor_notification() {
    let (state, mut feed) = AppState::start(AppConfig::default());

    let mut session = auth::mfc_login(&state, "driver@mfc.com", "demo123")
        .await
        .unwrap();
    let courier = session.as_driver_mut().unwrap();
    driver::log_waste_pickup(&state, courier, "vendor1", "1")
        .await
        .unwrap();

    session.logout();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let titles: Vec<String> = feed.drain().into_iter().map(|n| n.title).collect();
    assert!(!titles.contains(&"Vendor Notification Sent".to_string()));
}
