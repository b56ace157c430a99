use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{DialogSession, SessionToken};
use crate::types::DialogFields;

/// Shared handle to a page's dialog session.
///
/// The lock is only ever held for one synchronous operation, never across an
/// `.await`.
#[derive(Debug)]
pub struct SessionHandle<F> {
    inner: Arc<Mutex<DialogSession<F>>>,
}

impl<F> Clone for SessionHandle<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: DialogFields> Default for SessionHandle<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DialogFields> SessionHandle<F> {
    pub fn new() -> Self {
        Self::from_session(DialogSession::new())
    }

    pub fn from_session(session: DialogSession<F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run one mutation against the session.
    pub fn update<R>(&self, f: impl FnOnce(&mut DialogSession<F>) -> R) -> R {
        f(&mut lock(&self.inner))
    }

    /// Read from the session.
    pub fn read<R>(&self, f: impl FnOnce(&DialogSession<F>) -> R) -> R {
        f(&lock(&self.inner))
    }

    /// Run `f` only if the session behind `token` is still live.
    pub fn update_if_live<R>(
        &self,
        token: SessionToken,
        f: impl FnOnce(&mut DialogSession<F>) -> R,
    ) -> Option<R> {
        let mut session = lock(&self.inner);
        if session.is_live(token) {
            Some(f(&mut session))
        } else {
            None
        }
    }

    pub fn token(&self) -> SessionToken {
        self.read(DialogSession::token)
    }

    pub fn is_live(&self, token: SessionToken) -> bool {
        self.read(|s| s.is_live(token))
    }

    pub fn dispose(&self) {
        self.update(DialogSession::dispose);
    }
}

/// Lock, ignoring poisoning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
