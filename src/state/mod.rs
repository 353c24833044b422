//! State module for tracking page renders and resource downloads
//!
//! # Components
//!
//! - `RenderStatus`: Outcome of rendering one page address
//! - `ResourceStatus`: Lifecycle of one resource download (pending, probed, downloaded, skipped, failed)

mod render_status;
mod resource_status;

// Re-export main types
pub use render_status::RenderStatus;
pub use resource_status::ResourceStatus;
