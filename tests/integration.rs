use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use rxlite::{ops, prelude::*};

fn ms(n: u64) -> Duration { Duration::from_millis(n) }

type Event = (Duration, Notification<Vec<i32>, Fault>);

#[derive(Clone, Debug, PartialEq)]
enum Fault {
  Source(&'static str),
  Engine(RxError),
}

impl From<RxError> for Fault {
  fn from(e: RxError) -> Self { Fault::Engine(e) }
}

/// A cold source replaying `script` on `scheduler`, relative to subscribe time.
fn scripted<Item: Clone + 'static>(
  scheduler: &TestScheduler, script: Vec<(u64, Notification<Item, Fault>)>,
) -> Observable<Item, Fault> {
  let scheduler = scheduler.clone();
  Observable::new(move |subscriber: Subscriber<Item, Fault>| {
    let tasks = Subscription::new();
    for (at, notification) in script.clone() {
      let s = subscriber.clone();
      tasks.add(scheduler.schedule_once(ms(at), move || match notification {
        Notification::Next(v) => s.next(v),
        Notification::Error(e) => s.error(e),
        Notification::Complete => s.complete(),
      }));
    }
    tasks
  })
}

fn record_vec(log: &Rc<RefCell<Vec<Event>>>, scheduler: &TestScheduler) -> Handlers<Vec<i32>, Fault> {
  let (n, e, c) = (log.clone(), log.clone(), log.clone());
  let (s1, s2, s3) = (scheduler.clone(), scheduler.clone(), scheduler.clone());
  Handlers::new()
    .on_next(move |v| n.borrow_mut().push((s1.now(), Notification::Next(v))))
    .on_error(move |err| e.borrow_mut().push((s2.now(), Notification::Error(err))))
    .on_complete(move || c.borrow_mut().push((s3.now(), Notification::Complete)))
}

#[test]
fn fork_join_emits_once_all_sources_complete() {
  let scheduler = TestScheduler::new();
  let a = scripted(&scheduler, vec![(5, Notification::Next(1)), (10, Notification::Complete)]);
  let b = scripted(&scheduler, vec![(15, Notification::Next(2)), (20, Notification::Complete)]);
  let log = Rc::default();
  fork_join(vec![a, b]).subscribe_with(record_vec(&log, &scheduler));

  scheduler.flush();
  assert_eq!(
    *log.borrow(),
    vec![(ms(20), Notification::Next(vec![1, 2])), (ms(20), Notification::Complete)]
  );
}

#[test]
fn fork_join_fails_fast() {
  let scheduler = TestScheduler::new();
  let a = scripted(&scheduler, vec![(5, Notification::Next(1)), (10, Notification::Complete)]);
  let b = scripted(&scheduler, vec![(15, Notification::Error(Fault::Source("b failed")))]);
  let c = scripted(&scheduler, vec![(30, Notification::Next(3)), (40, Notification::Complete)]);
  let log = Rc::default();
  fork_join(vec![a, b, c]).subscribe_with(record_vec(&log, &scheduler));

  scheduler.flush();
  assert_eq!(*log.borrow(), vec![(ms(15), Notification::Error(Fault::Source("b failed")))]);
  assert!(scheduler.is_empty());
}

#[test]
fn combine_latest_sequence() {
  let scheduler = TestScheduler::new();
  let a = scripted(
    &scheduler,
    vec![(0, Notification::Next(1)), (20, Notification::Next(3)), (30, Notification::Complete)],
  );
  let b = scripted(&scheduler, vec![(10, Notification::Next(2)), (40, Notification::Complete)]);
  let log = Rc::default();
  combine_latest(vec![a, b]).subscribe_with(record_vec(&log, &scheduler));

  scheduler.advance_by(ms(5));
  assert!(log.borrow().is_empty());
  scheduler.flush();
  assert_eq!(
    *log.borrow(),
    vec![
      (ms(10), Notification::Next(vec![1, 2])),
      (ms(20), Notification::Next(vec![3, 2])),
      (ms(40), Notification::Complete),
    ]
  );
}

#[test]
fn debounce_emits_last_value_of_a_burst() {
  let scheduler = TestScheduler::new();
  let source = scripted(
    &scheduler,
    vec![
      (0, Notification::Next(1)),
      (30, Notification::Next(2)),
      (60, Notification::Next(3)),
      (300, Notification::Next(4)),
      (500, Notification::Complete),
    ],
  );
  let seen = Rc::new(RefCell::new(vec![]));
  let s = seen.clone();
  let clock = scheduler.clone();
  source
    .debounce_time(ms(100), scheduler.clone())
    .subscribe_with(
      Handlers::new()
        .on_next(move |v| s.borrow_mut().push((clock.now(), v)))
        .on_error(|_| {}),
    );

  scheduler.flush();
  assert_eq!(*seen.borrow(), vec![(ms(160), 3), (ms(400), 4)]);
}

#[test]
fn catch_error_hides_source_error() {
  let errors = Rc::new(Cell::new(0));
  let out = Rc::new(RefCell::new(vec![]));
  let (e, o) = (errors.clone(), out.clone());
  Observable::new(|s: Subscriber<i32, &'static str>| {
    s.next(1);
    s.error("source");
  })
  .catch_error(|_| from_iter::<_, &'static str>(vec![7, 8]))
  .subscribe_with(
    Handlers::new()
      .on_next(move |v| o.borrow_mut().push(v))
      .on_error(move |_| e.set(e.get() + 1)),
  );
  assert_eq!(*out.borrow(), vec![1, 7, 8]);
  assert_eq!(errors.get(), 0);
}

#[test]
fn switch_map_over_timers() {
  let scheduler = TestScheduler::new();
  let outer = Subject::<u64, ()>::new();
  let seen = Rc::new(RefCell::new(vec![]));
  let s = seen.clone();
  let inner_scheduler = scheduler.clone();
  outer
    .observable()
    .switch_map(move |delay| timer::<()>(ms(delay), inner_scheduler.clone()).map(move |_| delay))
    .subscribe(move |v| s.borrow_mut().push(v));

  outer.next(50);
  scheduler.advance_by(ms(10));
  outer.next(20);
  assert_eq!(scheduler.pending_count(), 1);
  scheduler.flush();
  assert_eq!(*seen.borrow(), vec![20]);
}

#[test]
fn pipeline_of_free_operators() {
  let out = Rc::new(RefCell::new(vec![]));
  let o = out.clone();
  from_iter::<_, ()>(1..=10)
    .pipe(ops::filter(|v: &i32| v % 2 == 1))
    .pipe(ops::map_indexed(|v: i32, i| (i, v * v)))
    .pipe(ops::take(3))
    .subscribe(move |v| o.borrow_mut().push(v));
  assert_eq!(*out.borrow(), vec![(0, 1), (1, 9), (2, 25)]);
}

#[test]
fn subject_feeds_concat_map_with_materialize() {
  let subject = Subject::<i32, &'static str>::new();
  let out = Rc::new(RefCell::new(vec![]));
  let o = out.clone();
  subject
    .observable()
    .concat_map(|v| from_iter(vec![v, v * 10]))
    .materialize()
    .subscribe(move |n| o.borrow_mut().push(n));

  subject.next(1);
  subject.next(2);
  subject.error("stop");
  assert_eq!(
    *out.borrow(),
    vec![
      Notification::Next(1),
      Notification::Next(10),
      Notification::Next(2),
      Notification::Next(20),
      Notification::Error("stop"),
    ]
  );
}

#[test]
fn guard_unsubscribes_on_scope_exit() {
  let subject = Subject::<i32>::new();
  {
    let _guard = subject.subscribe(|_| {}).unsubscribe_when_dropped();
    assert_eq!(subject.observer_count(), 1);
  }
  assert_eq!(subject.observer_count(), 0);
}
