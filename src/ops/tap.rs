use std::rc::Rc;

use crate::{observable::Observable, observer::Handlers, subscriber::Subscriber};

/// Side effects run by [`tap`] before each notification is forwarded.
pub struct Tap<Item, Err> {
  next: Option<Rc<dyn Fn(&Item)>>,
  error: Option<Rc<dyn Fn(&Err)>>,
  complete: Option<Rc<dyn Fn()>>,
}

impl<Item, Err> Default for Tap<Item, Err> {
  fn default() -> Self { Self { next: None, error: None, complete: None } }
}

impl<Item, Err> Clone for Tap<Item, Err> {
  fn clone(&self) -> Self {
    Self { next: self.next.clone(), error: self.error.clone(), complete: self.complete.clone() }
  }
}

impl<Item, Err> Tap<Item, Err> {
  pub fn new() -> Self { Self::default() }

  pub fn on_next(mut self, f: impl Fn(&Item) + 'static) -> Self {
    self.next = Some(Rc::new(f));
    self
  }

  pub fn on_error(mut self, f: impl Fn(&Err) + 'static) -> Self {
    self.error = Some(Rc::new(f));
    self
  }

  pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
    self.complete = Some(Rc::new(f));
    self
  }
}

/// Run side effects for each notification, then forward it unchanged.
pub fn tap<Item, Err>(tap: Tap<Item, Err>) -> impl FnOnce(Observable<Item, Err>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  move |source| {
    Observable::new(move |downstream: Subscriber<Item, Err>| {
      let Tap { next, error, complete } = tap.clone();
      let (d_next, d_error, d_complete) = (downstream.clone(), downstream.clone(), downstream.clone());
      let upstream = Subscriber::new(
        Handlers::new()
          .on_next(move |v| {
            if let Some(f) = &next {
              f(&v);
            }
            d_next.next(v);
          })
          .on_error(move |e| {
            if let Some(f) = &error {
              f(&e);
            }
            d_error.error(e);
          })
          .on_complete(move || {
            if let Some(f) = &complete {
              f();
            }
            d_complete.complete();
          }),
      );
      downstream.subscription().add_until_closed(upstream.subscription());
      source.actual_subscribe(upstream);
    })
  }
}
