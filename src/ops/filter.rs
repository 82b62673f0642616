use std::rc::Rc;

use crate::{observable::Observable, subscriber::Subscriber};

/// Forward only the values for which `pred` returns `true`.
pub fn filter<Item, Err>(
  pred: impl Fn(&Item) -> bool + 'static,
) -> impl FnOnce(Observable<Item, Err>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  let pred = Rc::new(pred);
  move |source| {
    Observable::new(move |downstream: Subscriber<Item, Err>| {
      let pred = pred.clone();
      let next = downstream.clone();
      let upstream = Subscriber::chain(&downstream, move |v| {
        if pred(&v) {
          next.next(v);
        }
      });
      source.actual_subscribe(upstream);
    })
  }
}
