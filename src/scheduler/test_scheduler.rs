//! Virtual-time scheduler for deterministic tests of time-based operators.
//!
//! Time only moves when the test says so:
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use rxlite::prelude::*;
//!
//! let scheduler = TestScheduler::new();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let s = seen.clone();
//! timer::<()>(Duration::from_millis(100), scheduler.clone())
//!   .subscribe(move |v| s.borrow_mut().push(v));
//!
//! scheduler.advance_by(Duration::from_millis(99));
//! assert!(seen.borrow().is_empty());
//! scheduler.advance_by(Duration::from_millis(1));
//! assert_eq!(*seen.borrow(), vec![0]);
//! ```

use std::collections::BTreeMap;

use super::{Duration, Scheduler, TaskId};
use crate::rc::MutRc;

/// Cheap to clone; clones share the same clock and queue.
#[derive(Clone, Default)]
pub struct TestScheduler(MutRc<State>);

#[derive(Default)]
struct State {
  now: Duration,
  next_id: u64,
  // Ordered by due time, then FIFO by id for equal due times.
  queue: BTreeMap<(Duration, u64), Box<dyn FnOnce()>>,
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// Current virtual time, starting at zero.
  pub fn now(&self) -> Duration { self.0.rc_deref().now }

  pub fn pending_count(&self) -> usize { self.0.rc_deref().queue.len() }

  pub fn is_empty(&self) -> bool { self.0.rc_deref().queue.is_empty() }

  /// Advance the clock by `duration`, running every task that falls due.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.now() + duration;
    self.advance_to(target);
  }

  /// Advance the clock to `target`, running every task that falls due.
  pub fn advance_to(&self, target: Duration) {
    self.run_until(Some(target));
    let mut state = self.0.rc_deref_mut();
    if state.now < target {
      state.now = target;
    }
  }

  /// Run tasks until the queue is empty, jumping the clock to each due time.
  ///
  /// Never returns while a repeating task is still armed.
  pub fn flush(&self) { self.run_until(None); }

  fn run_until(&self, limit: Option<Duration>) {
    loop {
      let task = {
        let mut state = self.0.rc_deref_mut();
        let due = match state.queue.first_key_value() {
          Some((&(due, _), _)) if limit.map_or(true, |limit| due <= limit) => due,
          _ => break,
        };
        state.now = due;
        state.queue.pop_first().map(|(_, task)| task)
      };
      if let Some(task) = task {
        task();
      }
    }
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskId {
    let mut state = self.0.rc_deref_mut();
    let id = state.next_id;
    state.next_id += 1;
    let due = state.now + delay;
    state.queue.insert((due, id), task);
    TaskId(id)
  }

  fn cancel(&self, id: TaskId) {
    // Dropping the task outside the borrow: it may own subscriptions.
    let removed = {
      let mut state = self.0.rc_deref_mut();
      let key = state.queue.keys().find(|(_, i)| *i == id.0).copied();
      key.and_then(|key| state.queue.remove(&key))
    };
    drop(removed);
  }
}
