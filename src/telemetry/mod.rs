//! Tracing initialization for host applications.
//!
//! The subsystem itself only emits `tracing` events; hosts that do not bring
//! their own subscriber can call [`init_tracing`] once at startup.
//!
//! The filter honors `RUST_LOG` (e.g. `RUST_LOG=swiftride_notification_center=debug`).

use tracing_subscriber::{fmt, EnvFilter};

/// Install a console subscriber with env-based filtering.
///
/// Safe to call when a global subscriber is already set; the second
/// installation is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
