use tracing::debug;

use super::Observable;
use crate::{observer::Handlers, rc::MutRc, subscriber::Subscriber};

struct CombineState<Item> {
  latest: Vec<Option<Item>>,
  completed: usize,
}

/// Combines the latest value of every source.
///
/// Once every source has emitted at least once, emits a snapshot `Vec` (in
/// source order) and then another one on each later value from any source.
/// Completes when all sources have completed. The first error from any source
/// is forwarded and every other source is unsubscribed. An empty `sources`
/// list completes immediately.
pub fn combine_latest<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  Observable::new(move |subscriber: Subscriber<Vec<Item>, Err>| {
    let count = sources.len();
    if count == 0 {
      subscriber.complete();
      return;
    }
    let state = MutRc::own(CombineState { latest: vec![None; count], completed: 0 });

    for (index, source) in sources.iter().enumerate() {
      if subscriber.is_closed() {
        break;
      }
      let (on_next, on_complete) = (state.clone(), state.clone());
      let (next, error, complete) = (subscriber.clone(), subscriber.clone(), subscriber.clone());
      let inner = Subscriber::new(
        Handlers::new()
          .on_next(move |v| {
            let snapshot = {
              let mut state = on_next.rc_deref_mut();
              state.latest[index] = Some(v);
              state.latest.iter().cloned().collect::<Option<Vec<_>>>()
            };
            if let Some(snapshot) = snapshot {
              next.next(snapshot);
            }
          })
          .on_error(move |e| {
            debug!(index, "combine_latest source failed");
            error.error(e)
          })
          .on_complete(move || {
            let all_done = {
              let mut state = on_complete.rc_deref_mut();
              state.completed += 1;
              state.completed == count
            };
            if all_done {
              complete.complete();
            }
          }),
      );
      subscriber.subscription().add_until_closed(inner.subscription());
      source.actual_subscribe(inner);
    }
  })
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{
    notification::Notification,
    observable::{empty, of, throw_err},
    subject::Subject,
  };

  type Log = Rc<RefCell<Vec<Notification<Vec<i32>, &'static str>>>>;

  fn run(source: Observable<Vec<i32>, &'static str>) -> Log {
    let log = Log::default();
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    source.subscribe_with(
      Handlers::new()
        .on_next(move |v| n.borrow_mut().push(Notification::Next(v)))
        .on_error(move |err| e.borrow_mut().push(Notification::Error(err)))
        .on_complete(move || c.borrow_mut().push(Notification::Complete)),
    );
    log
  }

  #[test]
  fn emits_after_every_slot_filled() {
    let a = Subject::<i32, &'static str>::new();
    let b = Subject::<i32, &'static str>::new();
    let log = run(combine_latest(vec![a.observable(), b.observable()]));

    a.next(1);
    assert!(log.borrow().is_empty());
    b.next(10);
    a.next(2);
    b.next(20);
    a.complete();
    assert_eq!(log.borrow().len(), 3);
    b.complete();
    assert_eq!(
      *log.borrow(),
      vec![
        Notification::Next(vec![1, 10]),
        Notification::Next(vec![2, 10]),
        Notification::Next(vec![2, 20]),
        Notification::Complete,
      ]
    );
  }

  #[test]
  fn error_is_forwarded_and_others_dropped() {
    let a = Subject::<i32, &'static str>::new();
    let log = run(combine_latest(vec![a.observable(), throw_err("bad")]));
    assert_eq!(*log.borrow(), vec![Notification::Error("bad")]);
    assert_eq!(a.observer_count(), 0);
  }

  #[test]
  fn synchronous_sources() {
    let log = run(combine_latest(vec![of(1), of(2)]));
    assert_eq!(*log.borrow(), vec![Notification::Next(vec![1, 2]), Notification::Complete]);
  }

  #[test]
  fn empty_source_list_completes() {
    let log = run(combine_latest(vec![]));
    assert_eq!(*log.borrow(), vec![Notification::Complete]);
  }

  #[test]
  fn waits_for_every_source_even_one_that_never_emitted() {
    let b = Subject::<i32, &'static str>::new();
    let log = run(combine_latest(vec![empty(), b.observable()]));
    b.next(1);
    assert!(log.borrow().is_empty());
    b.complete();
    assert_eq!(*log.borrow(), vec![Notification::Complete]);
  }

  #[test]
  fn completed_source_detaches_from_the_execution() {
    let (a, b) = (Subject::<i32, &'static str>::new(), Subject::<i32, &'static str>::new());
    let subscription = combine_latest(vec![a.observable(), b.observable()]).subscribe(|_| {});
    assert_eq!(subscription.child_count(), 2);
    a.complete();
    assert_eq!(subscription.child_count(), 1);
  }
}
