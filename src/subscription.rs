//! Disposable resources.
//!
//! A [`Subscription`] represents one execution of an observable. It owns a
//! list of teardown actions and a set of child subscriptions. Ownership only
//! points downwards: closing a parent closes its children, while a child that
//! finishes on its own is detached with an explicit [`Subscription::remove`].

use std::{
  fmt::{Debug, Formatter},
  mem,
  panic::{catch_unwind, AssertUnwindSafe},
};

use smallvec::SmallVec;
use tracing::{error, trace};

use crate::rc::MutRc;

mod slots;
pub use slots::KeyedSlots;

/// Handle to a child registered with [`Subscription::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChildKey(usize);

/// Cancellation handle for one execution.
///
/// Cloning is cheap and every clone refers to the same underlying state.
#[derive(Clone, Default)]
pub struct Subscription(MutRc<Inner>);

#[derive(Default)]
struct Inner {
  closed: bool,
  teardowns: SmallVec<[Box<dyn FnOnce()>; 1]>,
  children: KeyedSlots<Subscription>,
}

impl Subscription {
  pub fn new() -> Self { Self::default() }

  /// A subscription whose only teardown is `f`.
  pub fn from_fn(f: impl FnOnce() + 'static) -> Self {
    let subscription = Self::new();
    subscription.add_teardown(f);
    subscription
  }

  /// A subscription that is already closed.
  pub fn closed() -> Self {
    let subscription = Self::new();
    subscription.0.rc_deref_mut().closed = true;
    subscription
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.rc_deref().closed }

  /// Close this subscription: flip the flag, close every child, then run the
  /// teardown actions. Calling it again is a no-op.
  pub fn unsubscribe(&self) {
    let (children, teardowns) = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      (inner.children.take_all(), mem::take(&mut inner.teardowns))
    };
    trace!(children = children.len(), teardowns = teardowns.len(), "subscription closed");

    for child in children {
      child.unsubscribe();
    }
    for teardown in teardowns {
      // A failing teardown must not prevent the others from running, nor
      // replace the notification that triggered the close.
      if catch_unwind(AssertUnwindSafe(teardown)).is_err() {
        error!("teardown action panicked; continuing with remaining teardowns");
      }
    }
  }

  /// Register a teardown action. On a closed subscription it runs at once.
  pub fn add_teardown(&self, f: impl FnOnce() + 'static) {
    let mut inner = self.0.rc_deref_mut();
    if inner.closed {
      drop(inner);
      f();
    } else {
      inner.teardowns.push(Box::new(f));
    }
  }

  /// Take ownership of `child`. A child added to a closed parent is
  /// unsubscribed immediately.
  pub fn add(&self, child: Subscription) -> ChildKey {
    let mut inner = self.0.rc_deref_mut();
    if self.0.ptr_eq(&child.0) {
      return ChildKey(inner.children.reserve_id());
    }
    if inner.closed {
      let key = ChildKey(inner.children.reserve_id());
      drop(inner);
      child.unsubscribe();
      return key;
    }
    if child.is_closed() {
      return ChildKey(inner.children.reserve_id());
    }
    inner.children.retain(|c| !c.is_closed());
    ChildKey(inner.children.add(child))
  }

  /// Like [`Subscription::add`], but `child` detaches itself from this
  /// subscription once it closes, however it closes.
  pub fn add_until_closed(&self, child: &Subscription) -> ChildKey {
    let key = self.add(child.clone());
    let parent = self.0.downgrade();
    child.add_teardown(move || {
      if let Some(parent) = parent.upgrade() {
        let detached = parent.rc_deref_mut().children.remove(key.0);
        drop(detached);
      }
    });
    key
  }

  /// Detach a child without closing it.
  pub fn remove(&self, key: ChildKey) -> Option<Subscription> {
    self.0.rc_deref_mut().children.remove(key.0)
  }

  /// Number of children currently attached.
  pub fn child_count(&self) -> usize { self.0.rc_deref().children.len() }

  /// Activates "RAII" behavior: the returned guard unsubscribes when it goes
  /// out of scope.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("teardowns", &inner.teardowns.len())
      .field("children", &inner.children.len())
      .finish()
  }
}

/// Unsubscribes the wrapped subscription when dropped.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

/// What an executor hands back to the engine when it is subscribed.
pub enum Teardown {
  Empty,
  Action(Box<dyn FnOnce()>),
  Subscription(Subscription),
}

impl Teardown {
  pub fn new(f: impl FnOnce() + 'static) -> Self { Teardown::Action(Box::new(f)) }

  pub(crate) fn attach_to(self, owner: &Subscription) {
    match self {
      Teardown::Empty => {}
      Teardown::Action(f) => owner.add_teardown(f),
      Teardown::Subscription(child) => {
        owner.add(child);
      }
    }
  }
}

impl From<()> for Teardown {
  fn from(_: ()) -> Self { Teardown::Empty }
}

impl From<Subscription> for Teardown {
  fn from(s: Subscription) -> Self { Teardown::Subscription(s) }
}
