//! Scheduler implementations.
//!
//! Every policy is served by the same [`Dispatcher`]; the policy of its
//! ready structure decides ordering and preemption.

mod dispatcher;
pub use dispatcher::Dispatcher;
