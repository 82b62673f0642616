//! The flattening family: `merge_map`, `concat_map`, `switch_map` and
//! `exhaust_map`.
//!
//! All four share one state machine. Each outer value is projected into an
//! inner observable; the [`FlattenPolicy`] decides whether that inner runs
//! now, waits in the queue, replaces the running inner or is dropped.

use std::{collections::VecDeque, mem, rc::Rc};

use tracing::trace;

use crate::{
  observable::Observable,
  observer::Handlers,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::{ChildKey, KeyedSlots},
};

/// How a flattening operator treats a new inner observable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlattenPolicy {
  /// Run up to `concurrent` inners at once; queue the rest in order.
  Merge { concurrent: usize },
  /// Unsubscribe the running inner, then subscribe the new one.
  Switch,
  /// Ignore outer values while an inner is running.
  Exhaust,
}

type Project<A, B, Err> = Rc<dyn Fn(A) -> Observable<B, Err>>;

struct FlattenState<B, Err> {
  active: KeyedSlots<ChildKey>,
  queue: VecDeque<Observable<B, Err>>,
  outer_completed: bool,
  // Set while `on_inner_complete` releases queued inners.
  draining: bool,
}

struct Flatten<A, B, Err> {
  policy: FlattenPolicy,
  project: Project<A, B, Err>,
  downstream: Subscriber<B, Err>,
  state: MutRc<FlattenState<B, Err>>,
}

impl<A: 'static, B: 'static, Err: 'static> Flatten<A, B, Err> {
  fn on_outer_next(self: &Rc<Self>, value: A) {
    match self.policy {
      FlattenPolicy::Merge { concurrent } => {
        let inner = (self.project)(value);
        let mut state = self.state.rc_deref_mut();
        if state.active.len() >= concurrent || !state.queue.is_empty() {
          state.queue.push_back(inner);
          return;
        }
        drop(state);
        self.subscribe_inner(inner);
      }
      FlattenPolicy::Switch => {
        let inner = (self.project)(value);
        let stale = self.state.rc_deref_mut().active.take_all();
        for key in stale {
          if let Some(subscription) = self.downstream.subscription().remove(key) {
            trace!("switching to a new inner observable");
            subscription.unsubscribe();
          }
        }
        self.subscribe_inner(inner);
      }
      FlattenPolicy::Exhaust => {
        if !self.state.rc_deref().active.is_empty() {
          trace!("inner observable still running, value dropped");
          return;
        }
        let inner = (self.project)(value);
        self.subscribe_inner(inner);
      }
    }
  }

  fn subscribe_inner(self: &Rc<Self>, inner: Observable<B, Err>) {
    let (next, error) = (self.downstream.clone(), self.downstream.clone());
    let id = self.state.rc_deref_mut().active.reserve_id();
    let this = self.clone();
    let subscriber = Subscriber::new(
      Handlers::new()
        .on_next(move |v| next.next(v))
        .on_error(move |e| error.error(e))
        .on_complete(move || this.on_inner_complete(id)),
    );
    let key = self.downstream.add(subscriber.subscription().clone());
    self.state.rc_deref_mut().active.insert(id, key);
    inner.actual_subscribe(subscriber);
  }

  fn on_inner_complete(self: &Rc<Self>, id: usize) {
    let (key, nested) = {
      let mut state = self.state.rc_deref_mut();
      let nested = mem::replace(&mut state.draining, true);
      (state.active.remove(id), nested)
    };
    if let Some(key) = key {
      self.downstream.subscription().remove(key);
    }
    // An inner completing while the queue is being released, usually a
    // synchronous one, leaves the next release to the running loop.
    if nested {
      return;
    }
    while let Some(inner) = self.next_queued() {
      self.subscribe_inner(inner);
    }
    self.state.rc_deref_mut().draining = false;
    self.check_complete();
  }

  fn next_queued(&self) -> Option<Observable<B, Err>> {
    let mut state = self.state.rc_deref_mut();
    match self.policy {
      FlattenPolicy::Merge { concurrent } if state.active.len() < concurrent => state.queue.pop_front(),
      _ => None,
    }
  }

  fn on_outer_complete(&self) {
    self.state.rc_deref_mut().outer_completed = true;
    self.check_complete();
  }

  fn check_complete(&self) {
    let done = {
      let state = self.state.rc_deref();
      state.outer_completed && state.active.is_empty() && state.queue.is_empty()
    };
    if done {
      self.downstream.complete();
    }
  }
}

/// The shared implementation behind every flattening operator.
pub fn flatten<A, B, Err>(
  policy: FlattenPolicy, project: impl Fn(A) -> Observable<B, Err> + 'static,
) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  let policy = match policy {
    FlattenPolicy::Merge { concurrent } => FlattenPolicy::Merge { concurrent: concurrent.max(1) },
    other => other,
  };
  let project: Project<A, B, Err> = Rc::new(project);
  move |source| {
    Observable::new(move |downstream: Subscriber<B, Err>| {
      let state = MutRc::own(FlattenState {
        active: KeyedSlots::default(),
        queue: VecDeque::new(),
        outer_completed: false,
        draining: false,
      });
      let on_teardown = state.clone();
      downstream.add_teardown(move || {
        let queue = mem::take(&mut on_teardown.rc_deref_mut().queue);
        drop(queue);
      });

      let flatten = Rc::new(Flatten { policy, project: project.clone(), downstream: downstream.clone(), state });
      let (on_next, on_complete, error) = (flatten.clone(), flatten, downstream.clone());
      let outer = Subscriber::new(
        Handlers::new()
          .on_next(move |v| on_next.on_outer_next(v))
          .on_error(move |e| error.error(e))
          .on_complete(move || on_complete.on_outer_complete()),
      );
      downstream.add(outer.subscription().clone());
      source.actual_subscribe(outer);
    })
  }
}

/// Subscribe every projected inner at once and interleave their values.
pub fn merge_map<A, B, Err>(
  project: impl Fn(A) -> Observable<B, Err> + 'static,
) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  flatten(FlattenPolicy::Merge { concurrent: usize::MAX }, project)
}

/// Like [`merge_map`], but with at most `concurrent` inners running; the rest
/// wait in arrival order. A limit of `0` is treated as `1`.
pub fn merge_map_concurrent<A, B, Err>(
  project: impl Fn(A) -> Observable<B, Err> + 'static, concurrent: usize,
) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  flatten(FlattenPolicy::Merge { concurrent }, project)
}

/// Run projected inners one after another, in arrival order.
pub fn concat_map<A, B, Err>(
  project: impl Fn(A) -> Observable<B, Err> + 'static,
) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  flatten(FlattenPolicy::Merge { concurrent: 1 }, project)
}

/// Only the most recent inner runs: a new outer value unsubscribes the
/// current inner before subscribing the next.
pub fn switch_map<A, B, Err>(
  project: impl Fn(A) -> Observable<B, Err> + 'static,
) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  flatten(FlattenPolicy::Switch, project)
}

/// Ignore outer values, without projecting them, while an inner is running.
pub fn exhaust_map<A, B, Err>(
  project: impl Fn(A) -> Observable<B, Err> + 'static,
) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  flatten(FlattenPolicy::Exhaust, project)
}
