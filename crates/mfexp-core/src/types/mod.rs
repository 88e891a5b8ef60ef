//! Validated value types.
//!
//! These types enforce their invariants at construction time.

mod service_url;

pub use service_url::ServiceUrl;
