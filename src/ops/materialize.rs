use std::convert::Infallible;

use crate::{notification::Notification, observable::Observable, observer::Handlers, subscriber::Subscriber};

/// Turn every notification into a value.
///
/// The source's terminal notification is emitted as a value too, followed by
/// completion, so the resulting stream never errors.
pub fn materialize<Item, Err>() -> impl FnOnce(Observable<Item, Err>) -> Observable<Notification<Item, Err>>
where
  Item: 'static,
  Err: 'static,
{
  move |source| {
    Observable::new(move |downstream: Subscriber<Notification<Item, Err>, Infallible>| {
      let (next, error, complete) = (downstream.clone(), downstream.clone(), downstream.clone());
      let upstream = Subscriber::new(
        Handlers::new()
          .on_next(move |v| next.next(Notification::Next(v)))
          .on_error(move |e| {
            error.next(Notification::Error(e));
            error.complete();
          })
          .on_complete(move || {
            complete.next(Notification::Complete);
            complete.complete();
          }),
      );
      downstream.add(upstream.subscription().clone());
      source.actual_subscribe(upstream);
    })
  }
}
