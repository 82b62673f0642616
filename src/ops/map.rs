use std::rc::Rc;

use crate::{observable::Observable, subscriber::Subscriber};

/// Transform every value with `f`.
pub fn map<A, B, Err>(f: impl Fn(A) -> B + 'static) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  map_indexed(move |v, _| f(v))
}

/// Transform every value with `f`, which also receives the value's index
/// within the current subscription.
pub fn map_indexed<A, B, Err>(
  f: impl Fn(A, usize) -> B + 'static,
) -> impl FnOnce(Observable<A, Err>) -> Observable<B, Err>
where
  A: 'static,
  B: 'static,
  Err: 'static,
{
  let f = Rc::new(f);
  move |source| {
    Observable::new(move |downstream: Subscriber<B, Err>| {
      let f = f.clone();
      let next = downstream.clone();
      let mut index = 0;
      let upstream = Subscriber::chain(&downstream, move |v| {
        let mapped = f(v, index);
        index += 1;
        next.next(mapped);
      });
      source.actual_subscribe(upstream);
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use proptest::prelude::*;

  use crate::observable::from_iter;

  #[test]
  fn primitive_type() {
    let out = Rc::new(RefCell::new(vec![]));
    let o = out.clone();
    from_iter::<_, ()>(vec![1, 2, 3])
      .map(|v| format!("#{v}"))
      .subscribe(move |v| o.borrow_mut().push(v));
    assert_eq!(*out.borrow(), vec!["#1", "#2", "#3"]);
  }

  #[test]
  fn index_restarts_per_subscription() {
    let source = from_iter::<_, ()>(vec!['a', 'b']).map_indexed(|c, i| format!("{c}{i}"));
    let out = Rc::new(RefCell::new(vec![]));
    for _ in 0..2 {
      let o = out.clone();
      source.subscribe(move |v| o.borrow_mut().push(v));
    }
    assert_eq!(*out.borrow(), vec!["a0", "b1", "a0", "b1"]);
  }

  proptest! {
    #[test]
    fn map_preserves_length_and_order(values in prop::collection::vec(any::<i32>(), 0..64)) {
      let out = Rc::new(RefCell::new(vec![]));
      let o = out.clone();
      from_iter::<_, ()>(values.clone())
        .map(|v| i64::from(v) * 2)
        .subscribe(move |v| o.borrow_mut().push(v));
      let expected: Vec<i64> = values.iter().map(|v| i64::from(*v) * 2).collect();
      prop_assert_eq!(out.borrow().clone(), expected);
    }
  }
}
