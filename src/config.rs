//! Per-thread engine configuration.
//!
//! The engine is single-threaded, so its configuration lives in a
//! thread-local. Today the only knob is what happens to an error notification
//! that reaches a subscriber without an error handler.

use std::{cell::RefCell, rc::Rc};

use tracing::error;

use crate::error::UnhandledError;

/// What to do with an error nobody handles.
#[derive(Clone, Default)]
pub enum UnhandledErrorPolicy {
  /// Log the error, then re-raise it as a panic on the current thread.
  #[default]
  Panic,
  /// Log the error and carry on.
  Log,
  /// Hand the error to a custom callback.
  Hook(Rc<dyn Fn(&UnhandledError)>),
}

#[derive(Clone, Default)]
pub struct EngineConfig {
  pub unhandled_error: UnhandledErrorPolicy,
}

thread_local! {
  static CONFIG: RefCell<EngineConfig> = RefCell::new(EngineConfig::default());
}

/// Install `policy` for the current thread and return the previous one.
pub fn set_unhandled_error_policy(policy: UnhandledErrorPolicy) -> UnhandledErrorPolicy {
  CONFIG.with(|c| std::mem::replace(&mut c.borrow_mut().unhandled_error, policy))
}

/// Read the current thread's configuration.
pub fn with_config<R>(f: impl FnOnce(&EngineConfig) -> R) -> R { CONFIG.with(|c| f(&c.borrow())) }

pub(crate) fn report_unhandled<Err: 'static>(err: Err) {
  let unhandled = UnhandledError::new(err);
  // Clone the policy out so a hook may reconfigure the engine.
  let policy = with_config(|c| c.unhandled_error.clone());
  match policy {
    UnhandledErrorPolicy::Panic => {
      error!(error_type = unhandled.type_name(), "unhandled error notification");
      panic!("{unhandled}");
    }
    UnhandledErrorPolicy::Log => {
      error!(error_type = unhandled.type_name(), "unhandled error notification");
    }
    UnhandledErrorPolicy::Hook(hook) => hook(&unhandled),
  }
}
