//! Observer trait and the canonical handler record.
//!
//! Consumers can hand the engine a bare `next` closure, a partial
//! [`Handlers`] set, or any type implementing [`Observer`]. All three shapes
//! are normalized into a `Handlers` value once, when the subscriber is built.

use crate::rc::MutRc;

/// The consumer of data in reactive programming.
///
/// `error` and `complete` consume the observer: nothing can be delivered
/// after a terminal notification.
pub trait Observer<Item, Err> {
  fn next(&mut self, value: Item);

  fn error(self, err: Err);

  fn complete(self);
}

/// A partial set of notification handlers.
///
/// A missing `next` or `complete` handler is a no-op. A missing `error`
/// handler makes an error notification *unhandled*, which is reported
/// through [`crate::config::UnhandledErrorPolicy`].
pub struct Handlers<Item, Err> {
  pub(crate) next: Option<Box<dyn FnMut(Item)>>,
  pub(crate) error: Option<Box<dyn FnOnce(Err)>>,
  pub(crate) complete: Option<Box<dyn FnOnce()>>,
}

impl<Item, Err> Default for Handlers<Item, Err> {
  fn default() -> Self { Self { next: None, error: None, complete: None } }
}

impl<Item, Err> Handlers<Item, Err> {
  pub fn new() -> Self { Self::default() }

  pub fn on_next(mut self, f: impl FnMut(Item) + 'static) -> Self {
    self.next = Some(Box::new(f));
    self
  }

  pub fn on_error(mut self, f: impl FnOnce(Err) + 'static) -> Self {
    self.error = Some(Box::new(f));
    self
  }

  pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
    self.complete = Some(Box::new(f));
    self
  }

  #[inline]
  pub fn has_error_handler(&self) -> bool { self.error.is_some() }

  pub(crate) fn clear(&mut self) {
    self.next = None;
    self.error = None;
    self.complete = None;
  }
}

impl<Item: 'static, Err: 'static> Handlers<Item, Err> {
  /// Adapt a full [`Observer`] implementation.
  pub fn from_observer<O>(observer: O) -> Self
  where
    O: Observer<Item, Err> + 'static,
  {
    let shared = MutRc::own(Some(observer));
    let on_next = shared.clone();
    let on_error = shared.clone();
    Self::new()
      .on_next(move |v| {
        if let Some(o) = on_next.rc_deref_mut().as_mut() {
          o.next(v);
        }
      })
      .on_error(move |e| {
        let observer = on_error.rc_deref_mut().take();
        if let Some(o) = observer {
          o.error(e);
        }
      })
      .on_complete(move || {
        let observer = shared.rc_deref_mut().take();
        if let Some(o) = observer {
          o.complete();
        }
      })
  }
}
