//! Errors produced by the engine itself.

use std::{
  any::{type_name, Any},
  fmt,
};

/// Error raised by a combinator rather than by a source.
///
/// Combinators that can fail on their own (such as
/// [`fork_join`](crate::observable::fork_join)) require the stream's error
/// type to implement `From<RxError>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RxError {
  /// The source at `index` completed without emitting a value.
  EmptySource { index: usize },
}

impl fmt::Display for RxError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RxError::EmptySource { index } => {
        write!(f, "source #{index} completed without emitting a value")
      }
    }
  }
}

impl std::error::Error for RxError {}

/// An error notification that reached a subscriber without an error handler.
pub struct UnhandledError {
  type_name: &'static str,
  payload: Box<dyn Any>,
}

impl UnhandledError {
  pub(crate) fn new<Err: 'static>(err: Err) -> Self {
    Self { type_name: type_name::<Err>(), payload: Box::new(err) }
  }

  /// Name of the stream's error type.
  pub fn type_name(&self) -> &'static str { self.type_name }

  pub fn downcast_ref<T: 'static>(&self) -> Option<&T> { self.payload.downcast_ref() }

  pub fn into_payload(self) -> Box<dyn Any> { self.payload }
}

impl fmt::Debug for UnhandledError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UnhandledError")
      .field("type_name", &self.type_name)
      .finish_non_exhaustive()
  }
}

impl fmt::Display for UnhandledError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unhandled error notification of type `{}`", self.type_name)
  }
}
