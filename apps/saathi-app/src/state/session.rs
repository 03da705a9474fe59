//! # Sessions
//!
//! What a successful login produces. The kind is fixed at login; switching
//! role means logging out and in again.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session::Vendor   vendor_id + CartState                                │
//! │  Session::Manager  MfcUser                                              │
//! │  Session::Driver   MfcUser + DeferredNotifications                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use saathi_core::{MfcUser, Role};
use tracing::info;

use super::cart::CartState;
use crate::notify::{DeferredNotifications, Notifier};

/// A logged-in vendor.
#[derive(Debug, Clone)]
pub struct VendorSession {
    vendor_id: String,
    cart: CartState,
}

impl VendorSession {
    pub fn new(vendor_id: impl Into<String>) -> Self {
        VendorSession {
            vendor_id: vendor_id.into(),
            cart: CartState::new(),
        }
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }
}

/// A logged-in MFC manager.
#[derive(Debug, Clone)]
pub struct ManagerSession {
    user: MfcUser,
}

impl ManagerSession {
    pub fn new(user: MfcUser) -> Self {
        ManagerSession { user }
    }

    pub fn user(&self) -> &MfcUser {
        &self.user
    }
}

/// A logged-in driver.
#[derive(Debug)]
pub struct DriverSession {
    user: MfcUser,
    deferred: DeferredNotifications,
}

impl DriverSession {
    pub fn new(user: MfcUser, notifier: Notifier) -> Self {
        DriverSession {
            user,
            deferred: DeferredNotifications::new(notifier),
        }
    }

    pub fn user(&self) -> &MfcUser {
        &self.user
    }

    pub fn driver_id(&self) -> &str {
        &self.user.uid
    }

    pub fn deferred(&mut self) -> &mut DeferredNotifications {
        &mut self.deferred
    }

    /// Scheduled notifications not yet reaped.
    pub fn pending_notifications(&mut self) -> usize {
        self.deferred.pending()
    }
}

/// A logged-in user of any role.
#[derive(Debug)]
pub enum Session {
    Vendor(VendorSession),
    Manager(ManagerSession),
    Driver(DriverSession),
}

impl Session {
    pub fn role(&self) -> Role {
        match self {
            Session::Vendor(_) => Role::Vendor,
            Session::Manager(_) => Role::Manager,
            Session::Driver(_) => Role::Driver,
        }
    }

    /// Vendor uid or staff uid.
    pub fn user_id(&self) -> &str {
        match self {
            Session::Vendor(s) => s.vendor_id(),
            Session::Manager(s) => &s.user().uid,
            Session::Driver(s) => s.driver_id(),
        }
    }

    pub fn as_vendor(&self) -> Option<&VendorSession> {
        match self {
            Session::Vendor(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_manager(&self) -> Option<&ManagerSession> {
        match self {
            Session::Manager(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_driver_mut(&mut self) -> Option<&mut DriverSession> {
        match self {
            Session::Driver(s) => Some(s),
            _ => None,
        }
    }

    /// Ends the session. Deferred notifications that have not fired are
    /// cancelled; the vendor's cart is discarded.
    pub fn logout(self) {
        info!(role = %self.role(), user_id = %self.user_id(), "Logged out");
        if let Session::Driver(mut driver) = self {
            driver.deferred.cancel_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{self, Notification, Severity};
    use std::time::Duration;

    fn driver() -> MfcUser {
        MfcUser {
            uid: "driver-1".to_string(),
            name: "Demo Driver".to_string(),
            email: "driver@mfc.com".to_string(),
            role: Role::Driver,
        }
    }

    #[test]
    fn test_roles() {
        let vendor = Session::Vendor(VendorSession::new("vendor1"));
        assert_eq!(vendor.role(), Role::Vendor);
        assert_eq!(vendor.user_id(), "vendor1");
        assert!(vendor.as_vendor().is_some());
        assert!(vendor.as_manager().is_none());

        let mut manager_user = driver();
        manager_user.role = Role::Manager;
        let manager = Session::Manager(ManagerSession::new(manager_user));
        assert_eq!(manager.role(), Role::Manager);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_cancels_deferred_notifications() {
        let (notifier, mut feed) = notify::channel();
        let mut session = Session::Driver(DriverSession::new(driver(), notifier));

        session.as_driver_mut().unwrap().deferred().schedule(
            Duration::from_secs(2),
            Notification::new("Vendor Notification Sent", "late", Severity::Info),
        );
        assert_eq!(session.role(), Role::Driver);

        session.logout();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(feed.drain().is_empty());
    }
}
