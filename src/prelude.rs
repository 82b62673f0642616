//! Prelude module for convenient imports.

#[cfg(feature = "futures")]
pub use crate::observable::{from_future, from_future_result};
#[cfg(feature = "timer")]
pub use crate::scheduler::LocalScheduler;
pub use crate::{
  error::RxError,
  notification::{Notification, Terminal},
  observable::{
    combine_latest, empty, fork_join, from_event, from_iter, interval, never, of, of_many, throw_err, timer,
    ExternalProducer, Observable,
  },
  observer::{Handlers, Observer},
  ops::{FlattenPolicy, Tap},
  scheduler::{Duration, Scheduler, SchedulerExt, TaskId, TestScheduler},
  subject::Subject,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionGuard, Teardown},
};
