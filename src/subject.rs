//! Hot multicast source.
//!
//! A [`Subject`] is both a source and a sink: values pushed into it with
//! [`Subject::next`] are broadcast to every subscriber registered at that
//! moment, in registration order. Once terminated, it replays the terminal
//! notification to anyone subscribing later.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use rxlite::prelude::*;
//!
//! let subject = Subject::<i32>::new();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let s = seen.clone();
//! subject.subscribe(move |v| s.borrow_mut().push(v));
//! subject.next(1);
//! subject.next(2);
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! ```

use std::{collections::VecDeque, convert::Infallible};

use tracing::trace;

use crate::{
  notification::{Notification, Terminal},
  observable::Observable,
  observer::{Handlers, Observer},
  rc::MutRc,
  subscriber::Subscriber,
  subscription::{Subscription, Teardown},
};

mod subscribers;
use subscribers::{broadcast, Subscribers};

/// Cheap to clone; clones share the same registry.
pub struct Subject<Item, Err = Infallible>(MutRc<SubjectState<Item, Err>>);

struct SubjectState<Item, Err> {
  observers: Subscribers<Item, Err>,
  terminal: Option<Terminal<Err>>,
  emitting: bool,
  pending: VecDeque<Notification<Item, Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self {
    Self(MutRc::own(SubjectState {
      observers: Subscribers::default(),
      terminal: None,
      emitting: false,
      pending: VecDeque::new(),
    }))
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// This subject as a plain [`Observable`], for operator chains.
  pub fn observable(&self) -> Observable<Item, Err> {
    let subject = self.clone();
    Observable::new(move |subscriber| subject.register(subscriber))
  }

  pub fn subscribe(&self, next: impl FnMut(Item) + 'static) -> Subscription { self.observable().subscribe(next) }

  pub fn subscribe_with(&self, handlers: Handlers<Item, Err>) -> Subscription {
    self.observable().subscribe_with(handlers)
  }

  pub fn subscribe_observer(&self, observer: impl Observer<Item, Err> + 'static) -> Subscription {
    self.observable().subscribe_observer(observer)
  }

  /// Handlers that push into this subject, for subscribing it to a source.
  ///
  /// ```rust
  /// use rxlite::prelude::*;
  ///
  /// let subject = Subject::<i32>::new();
  /// from_iter(1..=3).subscribe_with(subject.handlers());
  /// assert!(subject.is_stopped());
  /// ```
  pub fn handlers(&self) -> Handlers<Item, Err> {
    let (next, error, complete) = (self.clone(), self.clone(), self.clone());
    Handlers::new()
      .on_next(move |v| next.next(v))
      .on_error(move |e| error.error(e))
      .on_complete(move || complete.complete())
  }

  pub fn next(&self, value: Item) { self.dispatch(Notification::Next(value)); }

  pub fn error(&self, err: Err) { self.dispatch(Notification::Error(err)); }

  pub fn complete(&self) { self.dispatch(Notification::Complete); }

  /// Number of subscribers currently registered.
  pub fn observer_count(&self) -> usize { self.0.rc_deref().observers.len() }

  /// Whether the subject has received a terminal notification.
  pub fn is_stopped(&self) -> bool { self.0.rc_deref().terminal.is_some() }

  fn register(&self, subscriber: Subscriber<Item, Err>) -> Teardown {
    let terminal = self.0.rc_deref().terminal.clone();
    match terminal {
      Some(Terminal::Error(err)) => subscriber.error(err),
      Some(Terminal::Complete) => subscriber.complete(),
      None => {
        let id = self.0.rc_deref_mut().observers.add(subscriber);
        trace!(id, "subject subscriber registered");
        let registry = self.0.downgrade();
        return Teardown::new(move || {
          if let Some(state) = registry.upgrade() {
            let removed = state.rc_deref_mut().observers.remove(id);
            drop(removed);
          }
        });
      }
    }
    Teardown::Empty
  }

  fn dispatch(&self, notification: Notification<Item, Err>) {
    {
      let mut state = self.0.rc_deref_mut();
      if state.emitting {
        // Pushed from inside a subscriber's handler: broadcast after the
        // current notification reached everyone.
        state.pending.push_back(notification);
        return;
      }
      state.emitting = true;
    }

    let mut current = Some(notification);
    while let Some(notification) = current {
      self.emit(notification);
      current = self.0.rc_deref_mut().pending.pop_front();
    }
    self.0.rc_deref_mut().emitting = false;
  }

  fn emit(&self, notification: Notification<Item, Err>) {
    let targets = {
      let mut state = self.0.rc_deref_mut();
      if state.terminal.is_some() {
        return;
      }
      match &notification {
        Notification::Next(_) => state.observers.snapshot(),
        Notification::Error(e) => {
          state.terminal = Some(Terminal::Error(e.clone()));
          state.observers.drain()
        }
        Notification::Complete => {
          state.terminal = Some(Terminal::Complete);
          state.observers.drain()
        }
      }
    };
    match notification {
      Notification::Next(v) => broadcast(&targets, v, |s, v| s.next(v)),
      Notification::Error(e) => broadcast(&targets, e, |s, e| s.error(e)),
      Notification::Complete => targets.iter().for_each(|s| s.complete()),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use super::*;

  type Log = Rc<RefCell<Vec<String>>>;

  fn tagged(log: &Log, tag: &'static str) -> Handlers<i32, &'static str> {
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    Handlers::new()
      .on_next(move |v| n.borrow_mut().push(format!("{tag} next {v}")))
      .on_error(move |err| e.borrow_mut().push(format!("{tag} error {err}")))
      .on_complete(move || c.borrow_mut().push(format!("{tag} complete")))
  }

  #[test]
  fn broadcast_in_registration_order() {
    let log = Log::default();
    let subject = Subject::<i32, &'static str>::new();
    subject.subscribe_with(tagged(&log, "a"));
    subject.subscribe_with(tagged(&log, "b"));
    subject.next(1);
    subject.complete();
    subject.next(2);
    assert_eq!(*log.borrow(), vec!["a next 1", "b next 1", "a complete", "b complete"]);
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn late_subscriber_gets_terminal_replay() {
    let log = Log::default();
    let subject = Subject::<i32, &'static str>::new();
    subject.next(1);
    subject.error("gone");
    assert!(subject.is_stopped());
    let subscription = subject.subscribe_with(tagged(&log, "late"));
    assert!(subscription.is_closed());
    assert_eq!(*log.borrow(), vec!["late error gone"]);
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn late_subscriber_gets_completion_replay() {
    let log = Log::default();
    let subject = Subject::<i32, &'static str>::new();
    subject.next(1);
    subject.complete();
    let subscription = subject.subscribe_with(tagged(&log, "late"));
    assert!(subscription.is_closed());
    subject.next(2);
    assert_eq!(*log.borrow(), vec!["late complete"]);
  }

  #[test]
  fn unsubscribe_only_removes_that_subscriber() {
    let log = Log::default();
    let subject = Subject::<i32, &'static str>::new();
    let a = subject.subscribe_with(tagged(&log, "a"));
    subject.subscribe_with(tagged(&log, "b"));
    a.unsubscribe();
    assert_eq!(subject.observer_count(), 1);
    subject.next(5);
    assert_eq!(*log.borrow(), vec!["b next 5"]);
  }

  #[test]
  fn unsubscribing_during_broadcast() {
    let log = Log::default();
    let subject = Subject::<i32, &'static str>::new();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::default();
    let s = slot.clone();
    let l = log.clone();
    subject.subscribe(move |v| {
      l.borrow_mut().push(format!("a next {v}"));
      if let Some(b) = s.borrow().as_ref() {
        b.unsubscribe();
      }
    });
    *slot.borrow_mut() = Some(subject.subscribe_with(tagged(&log, "b")));
    subject.next(1);
    subject.next(2);
    assert_eq!(*log.borrow(), vec!["a next 1", "a next 2"]);
  }

  #[test]
  fn feedback_loop_keeps_emission_order() {
    let log = Log::default();
    let subject = Subject::<i32, &'static str>::new();
    let (feedback, l) = (subject.clone(), log.clone());
    subject.subscribe(move |v| {
      l.borrow_mut().push(format!("a next {v}"));
      if v < 3 {
        feedback.next(v + 1);
      }
    });
    subject.subscribe_with(tagged(&log, "b"));
    subject.next(1);
    assert_eq!(
      *log.borrow(),
      vec!["a next 1", "b next 1", "a next 2", "b next 2", "a next 3", "b next 3"]
    );
  }

  #[test]
  fn subject_as_sink() {
    let subject = Subject::<i32, ()>::new();
    let total = Rc::new(Cell::new(0));
    let t = total.clone();
    subject.subscribe(move |v| t.set(t.get() + v));
    crate::observable::from_iter(1..=4).subscribe_with(subject.handlers());
    assert_eq!(total.get(), 10);
    assert!(subject.is_stopped());
  }
}
