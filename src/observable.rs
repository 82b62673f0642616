//! The [`Observable`] type and the creation functions.
//!
//! An observable is an immutable value holding one *executor*: a function
//! that, given a [`Subscriber`], starts producing notifications and returns
//! the [`Teardown`] that stops it. Every call to `subscribe` runs the executor
//! again, so each subscription is an independent execution.

use std::{convert::Infallible, rc::Rc};

use tracing::trace;

use crate::{
  notification::Notification,
  observer::{Handlers, Observer},
  ops::{self, Tap},
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
  subscription::{Subscription, Teardown},
};

mod combine_latest;
mod fork_join;
mod from_event;
#[cfg(feature = "futures")]
mod from_future;
mod of;
mod timer;

pub use combine_latest::combine_latest;
pub use fork_join::fork_join;
pub use from_event::{from_event, ExternalProducer};
#[cfg(feature = "futures")]
pub use from_future::{from_future, from_future_result};
pub use of::{empty, from_iter, never, of, of_many, throw_err};
pub use timer::{interval, timer};

type Executor<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> Result<Teardown, Err>;

/// A lazy push-based collection of values over time.
///
/// Cloning is cheap: clones share the executor.
pub struct Observable<Item, Err = Infallible> {
  executor: Rc<Executor<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Self { executor: self.executor.clone() } }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Create an observable from an executor.
  ///
  /// The executor is called once per subscription with a fresh
  /// [`Subscriber`]; what it returns is run when that execution ends.
  ///
  /// ```rust
  /// use rxlite::prelude::*;
  ///
  /// let numbers = Observable::<i32>::new(|subscriber| {
  ///   subscriber.next(1);
  ///   subscriber.next(2);
  ///   subscriber.complete();
  /// });
  /// numbers.subscribe(|v| println!("{v}"));
  /// ```
  pub fn new<T>(executor: impl Fn(Subscriber<Item, Err>) -> T + 'static) -> Self
  where
    T: Into<Teardown>,
  {
    Self { executor: Rc::new(move |subscriber| Ok(executor(subscriber).into())) }
  }

  /// Create an observable from an executor that may fail while starting.
  ///
  /// An `Err` returned by the executor is delivered to the same subscriber
  /// as an error notification.
  pub fn try_new<T>(executor: impl Fn(Subscriber<Item, Err>) -> Result<T, Err> + 'static) -> Self
  where
    T: Into<Teardown>,
  {
    Self { executor: Rc::new(move |subscriber| executor(subscriber).map(Into::into)) }
  }

  /// Subscribe with only a `next` handler.
  ///
  /// An error notification on such a subscription is unhandled and goes
  /// through [`crate::config::UnhandledErrorPolicy`].
  pub fn subscribe(&self, next: impl FnMut(Item) + 'static) -> Subscription {
    self.subscribe_with(Handlers::new().on_next(next))
  }

  pub fn subscribe_with(&self, handlers: Handlers<Item, Err>) -> Subscription {
    let subscriber = Subscriber::new(handlers);
    self.actual_subscribe(subscriber.clone());
    subscriber.subscription().clone()
  }

  pub fn subscribe_observer(&self, observer: impl Observer<Item, Err> + 'static) -> Subscription {
    self.subscribe_with(Handlers::from_observer(observer))
  }

  /// Run one execution into an existing subscriber.
  pub fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) {
    trace!(item = std::any::type_name::<Item>(), "subscribe");
    match (self.executor)(subscriber.clone()) {
      Ok(teardown) => teardown.attach_to(subscriber.subscription()),
      Err(err) => subscriber.error(err),
    }
  }

  /// Apply an operator.
  ///
  /// ```rust
  /// use rxlite::{ops, prelude::*};
  ///
  /// from_iter::<_, ()>(1..=6)
  ///   .pipe(ops::filter(|v: &i32| v % 2 == 0))
  ///   .pipe(ops::map(|v: i32| v * 10))
  ///   .subscribe(|v| println!("{v}"));
  /// ```
  #[inline]
  pub fn pipe<R>(self, op: impl FnOnce(Self) -> R) -> R { op(self) }

  pub fn filter(self, pred: impl Fn(&Item) -> bool + 'static) -> Self { self.pipe(ops::filter(pred)) }

  pub fn map<B: 'static>(self, f: impl Fn(Item) -> B + 'static) -> Observable<B, Err> {
    self.pipe(ops::map(f))
  }

  pub fn map_indexed<B: 'static>(self, f: impl Fn(Item, usize) -> B + 'static) -> Observable<B, Err> {
    self.pipe(ops::map_indexed(f))
  }

  pub fn tap(self, tap: Tap<Item, Err>) -> Self { self.pipe(ops::tap(tap)) }

  pub fn take(self, count: usize) -> Self { self.pipe(ops::take(count)) }

  pub fn materialize(self) -> Observable<Notification<Item, Err>> { self.pipe(ops::materialize()) }

  pub fn debounce_time<S>(self, duration: Duration, scheduler: S) -> Self
  where
    S: Scheduler + Clone + 'static,
  {
    self.pipe(ops::debounce_time(duration, scheduler))
  }

  pub fn catch_error<Err2: 'static>(
    self, f: impl Fn(Err) -> Observable<Item, Err2> + 'static,
  ) -> Observable<Item, Err2> {
    self.pipe(ops::catch_error(f))
  }

  pub fn merge_map<B: 'static>(
    self, f: impl Fn(Item) -> Observable<B, Err> + 'static,
  ) -> Observable<B, Err> {
    self.pipe(ops::merge_map(f))
  }

  pub fn merge_map_concurrent<B: 'static>(
    self, f: impl Fn(Item) -> Observable<B, Err> + 'static, concurrent: usize,
  ) -> Observable<B, Err> {
    self.pipe(ops::merge_map_concurrent(f, concurrent))
  }

  pub fn concat_map<B: 'static>(
    self, f: impl Fn(Item) -> Observable<B, Err> + 'static,
  ) -> Observable<B, Err> {
    self.pipe(ops::concat_map(f))
  }

  pub fn switch_map<B: 'static>(
    self, f: impl Fn(Item) -> Observable<B, Err> + 'static,
  ) -> Observable<B, Err> {
    self.pipe(ops::switch_map(f))
  }

  pub fn exhaust_map<B: 'static>(
    self, f: impl Fn(Item) -> Observable<B, Err> + 'static,
  ) -> Observable<B, Err> {
    self.pipe(ops::exhaust_map(f))
  }
}
