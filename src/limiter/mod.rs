//! Rate limiting logic and state management.

mod log;
mod policy;
mod scoped;
mod sliding;

pub use log::RequestLog;
pub use policy::{Decision, Policy};
pub use scoped::ScopedLimiter;
pub use sliding::{KeyStatus, SlidingWindowLimiter};
