use std::collections::HashMap;

use futures::{
  executor::LocalSpawner,
  future::{abortable, AbortHandle},
  task::LocalSpawnExt,
};
use futures_time::task::sleep;
use tracing::warn;

use super::{Duration, Scheduler, TaskId};
use crate::rc::MutRc;

/// Runs tasks on a `futures` local executor using real timers.
///
/// ```rust no_run
/// use futures::executor::LocalPool;
/// use rxlite::prelude::*;
///
/// let mut pool = LocalPool::new();
/// let scheduler = LocalScheduler::new(pool.spawner());
/// interval::<()>(Duration::from_millis(10), scheduler)
///   .take(3)
///   .subscribe(|i| println!("tick {i}"));
/// pool.run();
/// ```
#[derive(Clone)]
pub struct LocalScheduler {
  spawner: LocalSpawner,
  registry: MutRc<Registry>,
}

#[derive(Default)]
struct Registry {
  next_id: u64,
  handles: HashMap<u64, AbortHandle>,
}

impl LocalScheduler {
  pub fn new(spawner: LocalSpawner) -> Self { Self { spawner, registry: MutRc::own(Registry::default()) } }

  /// Number of tasks spawned but not yet run or cancelled.
  pub fn pending_count(&self) -> usize { self.registry.rc_deref().handles.len() }
}

impl Scheduler for LocalScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskId {
    let (timer, handle) = abortable(sleep(delay.into()));
    let id = {
      let mut registry = self.registry.rc_deref_mut();
      let id = registry.next_id;
      registry.next_id += 1;
      registry.handles.insert(id, handle);
      id
    };

    let registry = self.registry.clone();
    let fut = async move {
      if timer.await.is_ok() {
        registry.rc_deref_mut().handles.remove(&id);
        task();
      }
    };
    if let Err(err) = self.spawner.spawn_local(fut) {
      warn!(%err, task = id, "failed to spawn scheduled task");
      self.registry.rc_deref_mut().handles.remove(&id);
    }
    TaskId(id)
  }

  fn cancel(&self, id: TaskId) {
    let handle = self.registry.rc_deref_mut().handles.remove(&id.0);
    if let Some(handle) = handle {
      handle.abort();
    }
  }
}
