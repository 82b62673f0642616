use tracing::debug;

use super::Observable;
use crate::{error::RxError, observer::Handlers, rc::MutRc, subscriber::Subscriber};

struct ForkJoinState<Item> {
  last: Vec<Option<Item>>,
  remaining: usize,
}

/// Waits for every source to complete, then emits their last values as one
/// `Vec` (in source order) and completes.
///
/// Fails fast: the first error from any source is forwarded and every other
/// source is unsubscribed. A source that completes without emitting fails the
/// whole stream with [`RxError::EmptySource`]. An empty `sources` list
/// completes immediately without emitting.
///
/// ```rust
/// use rxlite::{error::RxError, prelude::*};
///
/// fork_join::<_, RxError>(vec![of(1), from_iter(vec![2, 3])])
///   .subscribe(|v| assert_eq!(v, vec![1, 3]));
/// ```
pub fn fork_join<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err>
where
  Item: 'static,
  Err: From<RxError> + 'static,
{
  Observable::new(move |subscriber: Subscriber<Vec<Item>, Err>| {
    let count = sources.len();
    if count == 0 {
      subscriber.complete();
      return;
    }
    let state = MutRc::own(ForkJoinState { last: (0..count).map(|_| None).collect(), remaining: count });

    for (index, source) in sources.iter().enumerate() {
      // An earlier source may already have failed synchronously.
      if subscriber.is_closed() {
        break;
      }
      let on_next = state.clone();
      let on_complete = state.clone();
      let error = subscriber.clone();
      let complete = subscriber.clone();
      let inner = Subscriber::new(
        Handlers::new()
          .on_next(move |v| on_next.rc_deref_mut().last[index] = Some(v))
          .on_error(move |e| error.error(e))
          .on_complete(move || {
            let mut state = on_complete.rc_deref_mut();
            if state.last[index].is_none() {
              drop(state);
              debug!(index, "fork_join source completed without a value");
              complete.error(RxError::EmptySource { index }.into());
              return;
            }
            state.remaining -= 1;
            if state.remaining > 0 {
              return;
            }
            let values = state.last.drain(..).collect::<Option<Vec<_>>>();
            drop(state);
            if let Some(values) = values {
              complete.next(values);
            }
            complete.complete();
          }),
      );
      subscriber.subscription().add_until_closed(inner.subscription());
      source.actual_subscribe(inner);
    }
  })
}
