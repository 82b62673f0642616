//! Shared mutable cells used by the engine's state machines.
//!
//! Everything in rxlite runs on one thread, so shared state is an
//! `Rc<RefCell<T>>`. Borrows are always scoped so that no borrow is held
//! while user callbacks run.

use std::{
  cell::{Ref, RefCell, RefMut},
  rc::{Rc, Weak},
};

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

/// Non-owning handle to a [`MutRc`].
pub struct WeakMutRc<T>(Weak<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  #[inline]
  pub fn downgrade(&self) -> WeakMutRc<T> { WeakMutRc(Rc::downgrade(&self.0)) }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> WeakMutRc<T> {
  #[inline]
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakMutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<T> for MutRc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn weak_does_not_keep_value_alive() {
    let rc = MutRc::own(vec![1]);
    let weak = rc.downgrade();
    weak.upgrade().unwrap().rc_deref_mut().push(2);
    assert_eq!(*rc.rc_deref(), vec![1, 2]);
    drop(rc);
    assert!(weak.upgrade().is_none());
  }

  #[test]
  fn clones_share_state() {
    let a = MutRc::own(0);
    let b = a.clone();
    *b.rc_deref_mut() += 5;
    assert_eq!(*a.rc_deref(), 5);
    assert!(a.ptr_eq(&b));
  }
}
