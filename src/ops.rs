//! Operators.
//!
//! Every operator is a function returning an `FnOnce(Observable) ->
//! Observable` transformer, applied with [`Observable::pipe`]. The same
//! operators are also available as methods on [`Observable`].
//!
//! [`Observable`]: crate::observable::Observable
//! [`Observable::pipe`]: crate::observable::Observable::pipe

mod catch_error;
mod debounce;
mod filter;
mod flatten;
mod map;
mod materialize;
mod take;
mod tap;

pub use catch_error::catch_error;
pub use debounce::debounce_time;
pub use filter::filter;
pub use flatten::{concat_map, exhaust_map, flatten, merge_map, merge_map_concurrent, switch_map, FlattenPolicy};
pub use map::{map, map_indexed};
pub use materialize::materialize;
pub use take::take;
pub use tap::{tap, Tap};
