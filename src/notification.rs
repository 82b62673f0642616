//! The three-valued event vocabulary.

/// One event delivered to an observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// A notification that ends a subscription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminal<Err> {
  Error(Err),
  Complete,
}

impl<Item, Err> Notification<Item, Err> {
  /// `Error` and `Complete` end a subscription; `Next` does not.
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

  pub fn as_next(&self) -> Option<&Item> {
    match self {
      Notification::Next(v) => Some(v),
      _ => None,
    }
  }
}

impl<Item, Err> From<Terminal<Err>> for Notification<Item, Err> {
  fn from(t: Terminal<Err>) -> Self {
    match t {
      Terminal::Error(e) => Notification::Error(e),
      Terminal::Complete => Notification::Complete,
    }
  }
}
