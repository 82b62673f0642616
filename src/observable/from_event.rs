use tracing::trace;

use super::Observable;
use crate::subscription::Teardown;

/// A push source living outside the engine, such as an event emitter or a
/// callback-based driver.
pub trait ExternalProducer<Item> {
  /// Start delivering items to `handler`; the returned function detaches it.
  fn subscribe(&self, handler: Box<dyn FnMut(Item)>) -> Box<dyn FnOnce()>;
}

/// Lift an [`ExternalProducer`] into an observable.
///
/// Each subscription attaches one handler to the producer and detaches it on
/// unsubscribe. The resulting stream never completes on its own.
pub fn from_event<Item, Err, P>(producer: P) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
  P: ExternalProducer<Item> + 'static,
{
  Observable::new(move |subscriber| {
    let detach = producer.subscribe(Box::new(move |v| subscriber.next(v)));
    Teardown::new(move || {
      trace!("detaching external producer handler");
      detach()
    })
  })
}
