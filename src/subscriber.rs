//! The safety wrapper around a consumer's handlers.
//!
//! Every subscribe call builds one [`Subscriber`]. It owns the consumer's
//! [`Handlers`] and shares its closed state with the [`Subscription`]
//! returned to the consumer, so consumer-side unsubscribe and
//! producer-side termination go through the same state machine.

use std::collections::VecDeque;

use crate::{
  config::report_unhandled,
  notification::Notification,
  observer::Handlers,
  rc::MutRc,
  subscription::{ChildKey, Subscription},
};

/// Notification sink handed to executors.
///
/// Clones refer to the same subscriber.
pub struct Subscriber<Item, Err> {
  state: MutRc<State<Item, Err>>,
  subscription: Subscription,
}

struct State<Item, Err> {
  handlers: Handlers<Item, Err>,
  delivering: bool,
  pending: VecDeque<Notification<Item, Err>>,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item: 'static, Err: 'static> Subscriber<Item, Err> {
  pub fn new(handlers: Handlers<Item, Err>) -> Self {
    let subscription = Subscription::new();
    let state = MutRc::own(State { handlers, delivering: false, pending: VecDeque::new() });
    // Release the consumer's closures as soon as the execution ends,
    // however it ends.
    let weak = state.downgrade();
    subscription.add_teardown(move || {
      if let Some(state) = weak.upgrade() {
        let mut state = state.rc_deref_mut();
        state.handlers.clear();
        state.pending.clear();
      }
    });
    Self { state, subscription }
  }

  /// A subscriber feeding `downstream`: values go to `next`, terminal
  /// notifications are forwarded unchanged.
  ///
  /// The new subscriber is registered as a child of `downstream`, so
  /// cancelling downstream cancels it too.
  pub fn chain<Out: 'static>(
    downstream: &Subscriber<Out, Err>, next: impl FnMut(Item) + 'static,
  ) -> Self {
    let error = downstream.clone();
    let complete = downstream.clone();
    let subscriber = Self::new(
      Handlers::new()
        .on_next(next)
        .on_error(move |e| error.error(e))
        .on_complete(move || complete.complete()),
    );
    downstream.subscription().add_until_closed(&subscriber.subscription);
    subscriber
  }

  /// A subscriber that forwards everything into `downstream`.
  pub fn forwarding_to(downstream: &Subscriber<Item, Err>) -> Self {
    let next = downstream.clone();
    Self::chain(downstream, move |v| next.next(v))
  }

  pub fn next(&self, value: Item) { self.dispatch(Notification::Next(value)); }

  pub fn error(&self, err: Err) { self.dispatch(Notification::Error(err)); }

  pub fn complete(&self) { self.dispatch(Notification::Complete); }

  /// Consumer-side cancellation: closes without calling any handler.
  pub fn unsubscribe(&self) { self.subscription.unsubscribe(); }

  #[inline]
  pub fn is_closed(&self) -> bool { self.subscription.is_closed() }

  pub fn subscription(&self) -> &Subscription { &self.subscription }

  /// Attach a child subscription that is closed together with this one.
  pub fn add(&self, child: Subscription) -> ChildKey { self.subscription.add(child) }

  pub fn add_teardown(&self, f: impl FnOnce() + 'static) { self.subscription.add_teardown(f); }

  fn dispatch(&self, notification: Notification<Item, Err>) {
    if self.is_closed() {
      return;
    }
    {
      let mut state = self.state.rc_deref_mut();
      if state.delivering {
        // Re-entrant call from inside a handler: deliver once the current
        // handler returns, keeping emission order.
        state.pending.push_back(notification);
        return;
      }
      state.delivering = true;
    }

    let mut current = Some(notification);
    while let Some(notification) = current {
      match notification {
        Notification::Next(v) => self.deliver_next(v),
        Notification::Error(e) => self.deliver_error(e),
        Notification::Complete => self.deliver_complete(),
      }
      current = if self.is_closed() { None } else { self.state.rc_deref_mut().pending.pop_front() };
    }
    self.state.rc_deref_mut().delivering = false;
  }

  fn deliver_next(&self, value: Item) {
    let handler = self.state.rc_deref_mut().handlers.next.take();
    if let Some(mut handler) = handler {
      handler(value);
      if !self.is_closed() {
        self.state.rc_deref_mut().handlers.next = Some(handler);
      }
    }
  }

  fn deliver_error(&self, err: Err) {
    let handler = self.state.rc_deref_mut().handlers.error.take();
    self.subscription.unsubscribe();
    match handler {
      Some(handler) => handler(err),
      None => report_unhandled(err),
    }
  }

  fn deliver_complete(&self) {
    let handler = self.state.rc_deref_mut().handlers.complete.take();
    self.subscription.unsubscribe();
    if let Some(handler) = handler {
      handler();
    }
  }
}
