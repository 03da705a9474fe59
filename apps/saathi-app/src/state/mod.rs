//! # State Module
//!
//! Application-wide state and per-login sessions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  AppState (cloneable, shared by every session)                  │   │
//! │  │    config · catalog · BackendHandle · Notifier                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │VendorSession │  │ManagerSession│  │  DriverSession   │              │
//! │  │  CartState   │  │   MfcUser    │  │  MfcUser         │              │
//! │  │              │  │              │  │  deferred toasts │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  • AppState: read-only after start, backend owns mutable records       │
//! │  • Sessions: one logical writer each                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod session;

use std::sync::Arc;

use saathi_core::Catalog;
use tracing::info;

use crate::backend::{BackendHandle, MockBackend};
use crate::config::AppConfig;
use crate::notify::{self, NotificationFeed, Notifier};

pub use cart::CartState;
pub use session::{DriverSession, ManagerSession, Session, VendorSession};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub backend: BackendHandle,
    pub notifier: Notifier,
}

impl AppState {
    /// Spawns the mock backend and wires up the notification channel.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(config: AppConfig) -> (AppState, NotificationFeed) {
        let backend = MockBackend::from_config(&config).start();
        Self::with_backend(config, backend)
    }

    /// Builds state around an already running backend.
    pub fn with_backend(config: AppConfig, backend: BackendHandle) -> (AppState, NotificationFeed) {
        let (notifier, feed) = notify::channel();
        let catalog = Catalog::demo();

        info!(
            app = %config.app.name,
            products = catalog.len(),
            waste_rate = %config.waste_rate(),
            "Application state initialized"
        );

        let state = AppState {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            backend,
            notifier,
        };

        (state, feed)
    }
}
