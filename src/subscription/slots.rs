use smallvec::SmallVec;

/// Insertion-ordered storage addressed by stable numeric keys.
///
/// Used for a subscription's children, a subject's registry and the active
/// inner subscriptions of the flattening operators. A key can be reserved
/// before its item exists, which is how an inner observer learns its own key
/// before the inner subscription has been created.
pub struct KeyedSlots<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for KeyedSlots<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> KeyedSlots<U> {
  pub fn add(&mut self, item: U) -> usize {
    let id = self.reserve_id();
    self.items.push((id, item));
    id
  }

  #[inline]
  pub fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Insert under a key obtained from `reserve_id`.
  #[inline]
  pub fn insert(&mut self, id: usize, item: U) { self.items.push((id, item)); }

  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  pub fn retain(&mut self, mut keep: impl FnMut(&U) -> bool) { self.items.retain(|(_, item)| keep(item)); }

  /// Remove every item, in insertion order.
  pub fn take_all(&mut self) -> Vec<U> { self.items.drain(..).map(|(_, item)| item).collect() }

  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keys_are_stable_across_removal() {
    let mut slots = KeyedSlots::default();
    let a = slots.add("a");
    let b = slots.add("b");
    let c = slots.add("c");
    assert_eq!(slots.remove(b), Some("b"));
    assert!(slots.contains(a) && slots.contains(c));
    assert_eq!(slots.remove(b), None);
    assert_eq!(slots.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
  }

  #[test]
  fn reserved_key_can_be_filled_later() {
    let mut slots = KeyedSlots::default();
    let reserved = slots.reserve_id();
    let other = slots.add(1);
    assert!(!slots.contains(reserved));
    slots.insert(reserved, 2);
    assert_ne!(reserved, other);
    assert_eq!(slots.len(), 2);
    assert_eq!(slots.take_all(), vec![1, 2]);
    assert!(slots.is_empty());
  }
}
