//! `service-map version`

use crate::server::{HEALTH_PATH, SERVICE_MAP_PATH};

/// Print package name, version and served routes
pub fn display_version() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("  {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("  License: {}", env!("CARGO_PKG_LICENSE"));
    println!("  Routes: GET {}, GET {}", SERVICE_MAP_PATH, HEALTH_PATH);
}
