/*!
 * Core Module
 * Fundamental signal primitives, limits and error handling
 */

pub mod errors;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use sync::EventChannel;
