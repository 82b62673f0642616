use crate::{subscriber::Subscriber, subscription::KeyedSlots};

/// The registry of a subject's active subscribers, in registration order.
pub(crate) struct Subscribers<Item, Err> {
  inner: KeyedSlots<Subscriber<Item, Err>>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { inner: KeyedSlots::default() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  #[inline]
  pub(crate) fn add(&mut self, subscriber: Subscriber<Item, Err>) -> usize { self.inner.add(subscriber) }

  #[inline]
  pub(crate) fn remove(&mut self, id: usize) -> Option<Subscriber<Item, Err>> { self.inner.remove(id) }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.inner.len() }

  /// Copy of the current registry. Broadcasting iterates over a snapshot so
  /// handlers may subscribe or unsubscribe while it runs.
  pub(crate) fn snapshot(&self) -> Vec<Subscriber<Item, Err>> { self.inner.iter().cloned().collect() }

  pub(crate) fn drain(&mut self) -> Vec<Subscriber<Item, Err>> { self.inner.take_all() }
}

/// Hand `value` to every target, cloning it for all but the last one, which
/// receives the moved value.
pub(crate) fn broadcast<S, T: Clone>(targets: &[S], value: T, mut deliver: impl FnMut(&S, T)) {
  let mut iter = targets.iter().peekable();
  while let Some(target) = iter.next() {
    if iter.peek().is_some() {
      deliver(target, value.clone());
    } else {
      deliver(target, value);
      break;
    }
  }
}
