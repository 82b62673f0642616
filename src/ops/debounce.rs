use std::mem;

use tracing::trace;

use crate::{
  observable::Observable,
  observer::Handlers,
  rc::MutRc,
  scheduler::{Duration, Scheduler, SchedulerExt},
  subscriber::Subscriber,
  subscription::Subscription,
};

struct DebounceState<Item> {
  pending: Option<Item>,
  timer: Option<Subscription>,
}

impl<Item> DebounceState<Item> {
  fn cancel(state: &MutRc<Self>) -> Option<Item> {
    let (pending, timer) = {
      let mut state = state.rc_deref_mut();
      (state.pending.take(), state.timer.take())
    };
    if let Some(timer) = timer {
      timer.unsubscribe();
    }
    pending
  }
}

/// Emit a value only after `duration` has passed on `scheduler` without
/// another value arriving.
///
/// On completion the pending value, if any, is emitted before completing.
/// On error the pending value is dropped.
pub fn debounce_time<Item, Err, S>(
  duration: Duration, scheduler: S,
) -> impl FnOnce(Observable<Item, Err>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
  S: Scheduler + Clone + 'static,
{
  move |source| {
    Observable::new(move |downstream: Subscriber<Item, Err>| {
      let state = MutRc::own(DebounceState { pending: None, timer: None });
      let (on_next, on_error, on_complete, on_teardown) =
        (state.clone(), state.clone(), state.clone(), state.clone());
      let (next, error, complete) = (downstream.clone(), downstream.clone(), downstream.clone());
      let scheduler = scheduler.clone();

      let upstream = Subscriber::new(
        Handlers::new()
          .on_next(move |v| {
            let previous = {
              let mut state = on_next.rc_deref_mut();
              state.pending = Some(v);
              state.timer.take()
            };
            if let Some(previous) = previous {
              trace!("debounce timer restarted");
              previous.unsubscribe();
            }
            let (fire, next) = (on_next.clone(), next.clone());
            let timer = scheduler.schedule_once(duration, move || {
              let value = {
                let mut state = fire.rc_deref_mut();
                state.timer = None;
                state.pending.take()
              };
              if let Some(value) = value {
                next.next(value);
              }
            });
            on_next.rc_deref_mut().timer = Some(timer);
          })
          .on_error(move |e| {
            drop(DebounceState::cancel(&on_error));
            error.error(e);
          })
          .on_complete(move || {
            if let Some(value) = DebounceState::cancel(&on_complete) {
              complete.next(value);
            }
            complete.complete();
          }),
      );
      downstream.add_teardown(move || {
        let stale = DebounceState::cancel(&on_teardown);
        mem::drop(stale);
      });
      downstream.add(upstream.subscription().clone());
      source.actual_subscribe(upstream);
    })
  }
}
