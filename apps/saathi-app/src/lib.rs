//! # Saathi Circle Application Layer
//!
//! Sessions, dashboards and the simulated backend on top of `saathi-core`.
//!
//! ## Module Organization
//! ```text
//! saathi_app/
//! ├── lib.rs          ◄─── You are here (module wiring, tracing setup)
//! ├── config.rs       ◄─── AppConfig (defaults < saathi.toml < SAATHI_* env)
//! ├── notify.rs       ◄─── Notification sink + deferred notifications
//! ├── backend/
//! │   ├── mod.rs      ◄─── BackendHandle, commands, filters
//! │   └── mock.rs     ◄─── In-memory backend actor with demo data
//! ├── auth.rs         ◄─── OTP / MFC / demo login ──► Session
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── cart.rs     ◄─── CartState (Arc<Mutex<Cart>>)
//! │   └── session.rs  ◄─── Session (Vendor | Manager | Driver)
//! ├── commands/
//! │   ├── vendor.rs   ◄─── cart, place order, history
//! │   ├── manager.rs  ◄─── order control, procurement
//! │   └── driver.rs   ◄─── deliveries, waste pickups
//! ├── demo.rs         ◄─── Scripted walkthrough used by the binary
//! └── error.rs        ◄─── ApiError for command callers
//! ```
//!
//! ## Startup
//! ```rust,no_run
//! use saathi_app::config::AppConfig;
//! use saathi_app::state::AppState;
//!
//! # async fn start() {
//! let (state, _feed) = AppState::start(AppConfig::load_or_default(None));
//! let _session = saathi_app::auth::demo_login(&state, saathi_core::Role::Manager).await;
//! # }
//! ```

pub mod auth;
pub mod backend;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod notify;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=saathi_app=trace` - Trace for this crate only
/// - Default: INFO level
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
