pub mod calc;
pub mod catalog;
pub mod error;
pub mod model;
pub mod navigation;
pub mod session;
pub mod settings;
pub mod timer;
pub mod view;
pub mod voice;

pub use error::Error;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock `mutex`, recovering the guard if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
