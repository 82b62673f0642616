use std::future::Future;

use futures::{
  future::{abortable, FutureExt},
  task::{LocalSpawn, LocalSpawnExt},
};
use tracing::warn;

use super::Observable;
use crate::{subscriber::Subscriber, subscription::Teardown};

/// Converts a `Future` into an observable that emits its output once, then
/// completes.
///
/// The future is polled at most once across all subscriptions: it is shared,
/// and every subscription spawns a task on `spawner` that waits for it.
/// Unsubscribing aborts that task.
///
/// ```rust
/// use futures::{executor::LocalPool, future};
/// use rxlite::prelude::*;
///
/// let mut pool = LocalPool::new();
/// from_future::<_, _, ()>(future::ready(1), pool.spawner())
///   .subscribe(|v| assert_eq!(v, 1));
/// pool.run();
/// ```
///
/// To route a failed `Result` to the error handler, use
/// [`from_future_result`].
pub fn from_future<F, Item, Err>(
  future: F, spawner: impl LocalSpawn + 'static,
) -> Observable<Item, Err>
where
  F: Future<Output = Item> + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  from_future_result(future.map(Ok), spawner)
}

/// Like [`from_future`], for a future resolving to a `Result`: `Ok` is
/// emitted and followed by completion, `Err` becomes an error notification.
pub fn from_future_result<F, Item, Err>(
  future: F, spawner: impl LocalSpawn + 'static,
) -> Observable<Item, Err>
where
  F: Future<Output = Result<Item, Err>> + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  let shared = future.shared();
  Observable::new(move |subscriber: Subscriber<Item, Err>| {
    let (task, handle) = abortable(shared.clone());
    let emit = subscriber.clone();
    let task = task.map(move |output| match output {
      Ok(Ok(value)) => {
        emit.next(value);
        emit.complete();
      }
      Ok(Err(err)) => emit.error(err),
      Err(_aborted) => {}
    });
    if let Err(err) = spawner.spawn_local(task) {
      warn!(%err, "failed to spawn future");
      return Teardown::Empty;
    }
    Teardown::new(move || handle.abort())
  })
}
