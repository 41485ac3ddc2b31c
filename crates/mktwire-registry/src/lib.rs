//! Subscription registry for the mktwire gateway.
//!
//! One map from correlation token to subscription descriptor, built in
//! a single batch at startup. Unknown tokens resolve to None so the
//! dispatch loop can drop them without faulting.

pub mod error;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::SubscriptionRegistry;
