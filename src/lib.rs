//! # rxlite: a single-threaded reactive-stream engine
//!
//! Push-based streams of values over time, with synchronous cancellation.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! from_iter::<_, ()>(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {v}"));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Lazy source; each subscribe runs its executor once |
//! | [`Subscriber`] | Safety wrapper delivering notifications to handlers |
//! | [`Subscription`] | Handle to cancel an execution and its children |
//! | [`Subject`] | Hot multicast source that is also a sink |
//! | [`Scheduler`] | Delayed-execution capability for time-based operators |
//!
//! Everything runs on the thread that subscribes. Shared state is
//! `Rc<RefCell<_>>`, so none of these types are `Send`.
//!
//! ## Feature Flags
//!
//! - **`timer`** (default): [`LocalScheduler`], real timers on a `futures`
//!   local executor. Implies `futures`.
//! - **`futures`**: `from_future` and `from_future_result`.
//!
//! [`Observable`]: observable::Observable
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`Scheduler`]: scheduler::Scheduler
//! [`LocalScheduler`]: scheduler::LocalScheduler

pub mod config;
pub mod error;
pub mod notification;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
