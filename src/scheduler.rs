//! The scheduling capability consumed by time-based sources and operators.
//!
//! The engine never touches OS timers. Everything that needs delayed
//! execution (`timer`, `interval`, `debounce_time`) receives a [`Scheduler`]
//! value, so tests can substitute the virtual-time [`TestScheduler`].

use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use tracing::trace;

pub use std::time::Duration;

use crate::subscription::Subscription;

#[cfg(feature = "timer")]
mod local_scheduler;
mod test_scheduler;

#[cfg(feature = "timer")]
pub use local_scheduler::LocalScheduler;
pub use test_scheduler::TestScheduler;

/// Token identifying one scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Runs callbacks after a delay.
///
/// Implementations must run tasks on the thread that owns the engine, one at
/// a time. `cancel` must accept ids of tasks that already ran or were already
/// cancelled.
pub trait Scheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskId;

  fn cancel(&self, id: TaskId);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskId { (**self).schedule(delay, task) }

  fn cancel(&self, id: TaskId) { (**self).cancel(id) }
}

/// Subscription-returning helpers on top of [`Scheduler`].
pub trait SchedulerExt: Scheduler + Clone + 'static {
  /// Run `task` once after `delay`; unsubscribing cancels it.
  fn schedule_once(&self, delay: Duration, task: impl FnOnce() + 'static) -> Subscription {
    let id = self.schedule(delay, Box::new(task));
    trace!(?id, ?delay, "task scheduled");
    let scheduler = self.clone();
    Subscription::from_fn(move || scheduler.cancel(id))
  }

  /// Run `task` after `initial`, then every `period`, until unsubscribed.
  fn schedule_repeating(
    &self, initial: Duration, period: Duration, task: impl FnMut() + 'static,
  ) -> Subscription {
    let repeating = Rc::new(Repeating {
      scheduler: self.clone(),
      period,
      task: RefCell::new(Box::new(task)),
      current: Cell::new(None),
      cancelled: Cell::new(false),
    });
    Repeating::arm(&repeating, initial);
    Subscription::from_fn(move || {
      repeating.cancelled.set(true);
      if let Some(id) = repeating.current.take() {
        repeating.scheduler.cancel(id);
      }
    })
  }
}

impl<S: Scheduler + Clone + 'static> SchedulerExt for S {}

struct Repeating<S> {
  scheduler: S,
  period: Duration,
  task: RefCell<Box<dyn FnMut()>>,
  current: Cell<Option<TaskId>>,
  cancelled: Cell<bool>,
}

impl<S: Scheduler + 'static> Repeating<S> {
  fn arm(this: &Rc<Self>, delay: Duration) {
    let me = this.clone();
    let id = this.scheduler.schedule(
      delay,
      Box::new(move || {
        me.current.set(None);
        if me.cancelled.get() {
          return;
        }
        (me.task.borrow_mut())();
        if !me.cancelled.get() {
          Repeating::arm(&me, me.period);
        }
      }),
    );
    this.current.set(Some(id));
  }
}
