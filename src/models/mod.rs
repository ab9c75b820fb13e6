//! Service map model layer
//!
//! Structure:
//! - `resource_kind.rs` - The six resource kinds and node id construction

pub mod resource_kind;

pub use resource_kind::ResourceKind;
