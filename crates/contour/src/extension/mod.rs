//! Extension points for collaborators outside the engine
//!
//! - [`AsyncRefinement`] / [`AsyncSchema`]: awaitable checks after validation
//! - [`ParseObserver`] / [`Monitored`]: lifecycle callbacks around `parse`

mod asynchronous;
mod monitor;

pub use asynchronous::{AsyncRefinement, AsyncSchema};
pub use monitor::{Monitored, ParseObserver, TracingObserver};
