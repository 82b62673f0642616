use std::rc::Rc;

use tracing::debug;

use crate::{observable::Observable, observer::Handlers, subscriber::Subscriber};

/// Recover from an error by continuing with the observable returned by `f`.
///
/// Values and completion pass through unchanged. When the source errors,
/// `f(err)` is subscribed and its notifications, including its own
/// terminal one, are forwarded downstream.
pub fn catch_error<Item, Err, Err2>(
  f: impl Fn(Err) -> Observable<Item, Err2> + 'static,
) -> impl FnOnce(Observable<Item, Err>) -> Observable<Item, Err2>
where
  Item: 'static,
  Err: 'static,
  Err2: 'static,
{
  let f = Rc::new(f);
  move |source| {
    Observable::new(move |downstream: Subscriber<Item, Err2>| {
      let f = f.clone();
      let (next, fallback, complete) = (downstream.clone(), downstream.clone(), downstream.clone());
      let upstream = Subscriber::new(
        Handlers::new()
          .on_next(move |v| next.next(v))
          .on_error(move |e| {
            debug!("source failed, switching to fallback");
            let recovery = f(e);
            recovery.actual_subscribe(Subscriber::forwarding_to(&fallback));
          })
          .on_complete(move || complete.complete()),
      );
      downstream.subscription().add_until_closed(upstream.subscription());
      source.actual_subscribe(upstream);
    })
  }
}
