use tracing::trace;

use super::Observable;
use crate::{
  scheduler::{Duration, Scheduler, SchedulerExt},
  subscription::Teardown,
};

/// Emits `0` once `delay` has elapsed on `scheduler`, then completes.
///
/// Unsubscribing before the delay elapses cancels the scheduled task.
pub fn timer<Err: 'static>(
  delay: Duration, scheduler: impl Scheduler + Clone + 'static,
) -> Observable<usize, Err> {
  Observable::new(move |subscriber| {
    let handle = scheduler.schedule_once(delay, move || {
      subscriber.next(0);
      subscriber.complete();
    });
    Teardown::from(handle)
  })
}

/// Emits `0, 1, 2, …` every `period` on `scheduler`, never completing.
pub fn interval<Err: 'static>(
  period: Duration, scheduler: impl Scheduler + Clone + 'static,
) -> Observable<usize, Err> {
  Observable::new(move |subscriber| {
    let mut index = 0;
    let handle = scheduler.schedule_repeating(period, period, move || {
      trace!(index, "interval tick");
      subscriber.next(index);
      index += 1;
    });
    Teardown::from(handle)
  })
}
