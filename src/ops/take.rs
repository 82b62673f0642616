use crate::{observable::Observable, subscriber::Subscriber};

/// Forward the first `count` values, then complete and unsubscribe from the
/// source.
pub fn take<Item, Err>(count: usize) -> impl FnOnce(Observable<Item, Err>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  move |source| {
    Observable::new(move |downstream: Subscriber<Item, Err>| {
      if count == 0 {
        downstream.complete();
        return;
      }
      let next = downstream.clone();
      let mut taken = 0;
      let upstream = Subscriber::chain(&downstream, move |v| {
        taken += 1;
        next.next(v);
        if taken == count {
          next.complete();
        }
      });
      source.actual_subscribe(upstream);
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::{
    observable::{from_iter, never},
    observer::Handlers,
    subject::Subject,
  };

  #[test]
  fn base_function() {
    let out = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (o, c) = (out.clone(), completed.clone());
    from_iter::<_, ()>(0..100).take(5).subscribe_with(
      Handlers::new()
        .on_next(move |v| o.borrow_mut().push(v))
        .on_complete(move || c.set(true)),
    );
    assert_eq!(*out.borrow(), vec![0, 1, 2, 3, 4]);
    assert!(completed.get());
  }

  #[test]
  fn take_zero_never_subscribes() {
    let completed = Rc::new(Cell::new(false));
    let c = completed.clone();
    let subject = Subject::<i32, ()>::new();
    subject
      .observable()
      .take(0)
      .subscribe_with(Handlers::new().on_complete(move || c.set(true)));
    assert!(completed.get());
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn unsubscribes_source_when_done() {
    let subject = Subject::<i32, ()>::new();
    subject.observable().take(2).subscribe(|_| {});
    assert_eq!(subject.observer_count(), 1);
    subject.next(1);
    subject.next(2);
    assert_eq!(subject.observer_count(), 0);

    let subscription = never::<i32, ()>().take(1).subscribe(|_| {});
    assert!(!subscription.is_closed());
  }
}
