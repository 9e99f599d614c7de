//! Logging facilities for the mapping core.
//!
//! The mapping engine uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("cellmap_core::resolver=trace")
//!     .init();
//! ```
//!
//! Resolution and dequeue run once per visible cell, so everything on those
//! paths logs at `trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Mapping construction and dequeue target.
    pub const MAPPING: &str = "cellmap_core::mapping";
    /// Candidate resolution target.
    pub const RESOLVER: &str = "cellmap_core::resolver";
    /// View container / reuse pool target.
    pub const CONTAINER: &str = "cellmap_core::container";
    /// Event reaction target.
    pub const REACTION: &str = "cellmap_core::reaction";
    /// Mapping registry target, used by the `cellmap` facade.
    pub const REGISTRY: &str = "cellmap::registry";
}
