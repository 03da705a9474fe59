//! # Login Surfaces
//!
//! Simulated authentication. Nothing is verified against a real identity
//! provider; each surface only decides which [`Session`] to open.
//!
//! ```text
//! Vendor:  send_otp(phone) ──► OtpChallenge ──► verify_otp(code) ──► Session::Vendor
//!          (10-digit mobile)                    (any 6-digit code)
//!
//! MFC:     mfc_login(email, password)
//!            email contains "manager" ──► Session::Manager
//!            email contains "driver"  ──► Session::Driver
//!            otherwise                ──► InvalidCredentials
//!
//! Demo:    demo_login(role) ──(demo delay)──► Session for the demo account
//! ```

use saathi_core::validation::{validate_credentials, validate_otp, validate_phone};
use saathi_core::{CoreError, CoreResult, MfcUser, Role};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::notify_failure;
use crate::error::ApiError;
use crate::state::{AppState, DriverSession, ManagerSession, Session, VendorSession};

/// Phone number of the demo vendor account.
pub const DEMO_VENDOR_PHONE: &str = "9876543210";
pub const DEMO_MANAGER_EMAIL: &str = "manager@mfc.com";
pub const DEMO_DRIVER_EMAIL: &str = "driver@mfc.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// An OTP has been "sent" to this number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpChallenge {
    /// Normalized 10-digit number.
    pub phone: String,
}

// =============================================================================
// Vendor
// =============================================================================

/// Starts a vendor login.
pub async fn send_otp(state: &AppState, phone: &str) -> Result<OtpChallenge, ApiError> {
    let phone = validate_phone(phone)
        .map_err(ApiError::from)
        .inspect_err(notify_failure(&state.notifier, "त्रुटि"))?;

    debug!(%phone, "OTP requested");
    state.notifier.info(
        "OTP भेजा गया",
        format!(
            "आपके फोन पर OTP भेजा गया है। डेमो के लिए कोई भी {} अंकों का OTP डालें।",
            state.config.simulation.otp_length
        ),
    );

    Ok(OtpChallenge { phone })
}

/// Completes a vendor login. Any code of the configured length is accepted.
pub async fn verify_otp(
    state: &AppState,
    challenge: &OtpChallenge,
    otp: &str,
) -> Result<Session, ApiError> {
    let result = async {
        validate_otp(otp, state.config.simulation.otp_length)?;
        let vendor = state.backend.find_vendor_by_phone(&challenge.phone).await?;
        Ok::<_, ApiError>(vendor)
    }
    .await
    .inspect_err(notify_failure(&state.notifier, "गलत OTP"))?;

    info!(vendor_id = %result.uid, "Vendor logged in");
    state
        .notifier
        .success("सफल लॉगिन", "आपका लॉगिन सफल हुआ है। आपका स्वागत है!");

    Ok(Session::Vendor(VendorSession::new(result.uid)))
}

// =============================================================================
// MFC Staff
// =============================================================================

/// Picks the dashboard for an MFC email address.
pub fn role_for_email(email: &str) -> CoreResult<Role> {
    let email = email.to_lowercase();
    if email.contains("manager") {
        Ok(Role::Manager)
    } else if email.contains("driver") {
        Ok(Role::Driver)
    } else {
        Err(CoreError::InvalidCredentials)
    }
}

/// Email + password login for managers and drivers.
pub async fn mfc_login(state: &AppState, email: &str, password: &str) -> Result<Session, ApiError> {
    let user = async {
        validate_credentials(email, password)?;
        let role = role_for_email(email)?;
        Ok::<_, ApiError>(state.backend.staff_sign_in(email, role).await?)
    }
    .await
    .inspect_err(notify_failure(&state.notifier, "Login Error"))?;

    let (title, message) = match user.role {
        Role::Manager => ("Manager Login Successful", "Welcome to MFC Dashboard"),
        _ => ("Driver Login Successful", "Welcome to Driver App"),
    };
    state.notifier.success(title, message);

    Ok(open_staff_session(state, user))
}

// =============================================================================
// Demo
// =============================================================================

/// One-tap login with the demo account for `role`.
pub async fn demo_login(state: &AppState, role: Role) -> Result<Session, ApiError> {
    tokio::time::sleep(state.config.demo_login_delay()).await;

    let session = open_demo_session(state, role)
        .await
        .inspect_err(notify_failure(&state.notifier, "Login Error"))?;

    let label = match role {
        Role::Vendor => "Vendor",
        Role::Manager => "Manager",
        Role::Driver => "Driver",
    };
    info!(%role, user_id = %session.user_id(), "Demo login");
    state
        .notifier
        .success(format!("{} Demo Login", label), "Welcome to the demo!");

    Ok(session)
}

async fn open_demo_session(state: &AppState, role: Role) -> Result<Session, ApiError> {
    let session = match role {
        Role::Vendor => {
            let vendor = state.backend.find_vendor_by_phone(DEMO_VENDOR_PHONE).await?;
            Session::Vendor(VendorSession::new(vendor.uid))
        }
        Role::Manager => {
            let user = state.backend.staff_sign_in(DEMO_MANAGER_EMAIL, role).await?;
            open_staff_session(state, user)
        }
        Role::Driver => {
            let user = state.backend.staff_sign_in(DEMO_DRIVER_EMAIL, role).await?;
            open_staff_session(state, user)
        }
    };
    Ok(session)
}

fn open_staff_session(state: &AppState, user: MfcUser) -> Session {
    info!(uid = %user.uid, role = %user.role, "Staff logged in");
    match user.role {
        Role::Driver => Session::Driver(DriverSession::new(user, state.notifier.clone())),
        _ => Session::Manager(ManagerSession::new(user)),
    }
}
