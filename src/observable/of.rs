use super::Observable;

/// Emits `value`, then completes.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// of::<_, ()>(123).subscribe(|v| println!("{v}"));
/// ```
pub fn of<Item, Err>(value: Item) -> Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  Observable::new(move |subscriber| {
    subscriber.next(value.clone());
    subscriber.complete();
  })
}

/// Emits each of `values` in order, then completes.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// of_many::<_, ()>(["Alice", "Ben"]).subscribe(|name| println!("{name}"));
/// ```
pub fn of_many<Item, Err>(values: impl IntoIterator<Item = Item>) -> Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  from_iter(values.into_iter().collect::<Vec<_>>())
}

/// Emits every item of `iter` in order, then completes.
///
/// Stops early when the subscriber is closed from inside a handler.
pub fn from_iter<I, Err>(iter: I) -> Observable<I::Item, Err>
where
  I: IntoIterator + Clone + 'static,
  I::Item: 'static,
  Err: 'static,
{
  Observable::new(move |subscriber| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  })
}

/// Completes immediately without emitting.
pub fn empty<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  Observable::new(|subscriber| subscriber.complete())
}

/// Never emits and never terminates.
pub fn never<Item: 'static, Err: 'static>() -> Observable<Item, Err> { Observable::new(|_| {}) }

/// Errors immediately with `err`.
pub fn throw_err<Item, Err>(err: Err) -> Observable<Item, Err>
where
  Item: 'static,
  Err: Clone + 'static,
{
  Observable::new(move |subscriber| subscriber.error(err.clone()))
}
