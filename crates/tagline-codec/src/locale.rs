//! Scoped "C" locale for the duration of one codec operation.
//!
//! The process locale is global state. [`LocaleGuard::enter`] snapshots it,
//! forces `LC_ALL=C` and holds a process-wide lock until the snapshot is put
//! back, either through [`LocaleGuard::release`] or on drop.

use std::ffi::{CStr, CString};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Result;

static LOCALE_LOCK: Mutex<()> = Mutex::new(());

const C_LOCALE: &CStr = c"C";

fn lock() -> MutexGuard<'static, ()> {
    LOCALE_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the caller's locale while the "C" locale is active.
#[derive(Debug)]
pub struct LocaleGuard {
    saved: Option<CString>,
    _lock: MutexGuard<'static, ()>,
}

impl LocaleGuard {
    /// Snapshot the current locale and switch to "C".
    pub fn enter() -> Result<Self> {
        let lock = lock();
        let saved = sys::query()?;
        sys::set(C_LOCALE)?;
        Ok(Self {
            saved: Some(saved),
            _lock: lock,
        })
    }

    /// Put the snapshotted locale back, reporting failure.
    pub fn release(mut self) -> Result<()> {
        match self.saved.take() {
            Some(saved) => sys::set(&saved),
            None => Ok(()),
        }
    }
}

impl Drop for LocaleGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            if let Err(err) = sys::set(&saved) {
                tracing::warn!(error = %err, "failed to restore locale");
            }
        }
    }
}

/// Combine an operation's outcome with the result of restoring the locale.
///
/// The operation's own error wins. A restore failure behind it is logged
/// so the stuck "C" locale does not go unnoticed.
pub(crate) fn settle<T>(outcome: Result<T>, restored: Result<()>) -> Result<T> {
    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) | (Err(err), Ok(())) => Err(err),
        (Err(err), Err(restore)) => {
            tracing::warn!(error = %restore, operation_error = %err, "failed to restore locale");
            Err(err)
        }
    }
}

/// Name of the current process locale (`LC_ALL` query).
pub fn current() -> Result<String> {
    let _lock = lock();
    sys::query().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(unix)]
mod sys {
    use std::ffi::{CStr, CString};

    use crate::error::{CodecError, Result};

    pub(super) fn query() -> Result<CString> {
        // SAFETY: a null locale argument only queries. The returned pointer
        // refers to libc-owned storage that we copy while holding LOCALE_LOCK.
        let ptr = unsafe { libc::setlocale(libc::LC_ALL, std::ptr::null()) };
        if ptr.is_null() {
            return Err(CodecError::Locale(
                "unable to query the current locale".to_string(),
            ));
        }
        // SAFETY: setlocale returned a non-null, NUL-terminated string.
        Ok(unsafe { CStr::from_ptr(ptr) }.to_owned())
    }

    pub(super) fn set(name: &CStr) -> Result<()> {
        // SAFETY: `name` is a valid NUL-terminated string for the duration of the call.
        let ptr = unsafe { libc::setlocale(libc::LC_ALL, name.as_ptr()) };
        if ptr.is_null() {
            Err(CodecError::Locale(format!(
                "unable to switch locale to {:?}",
                name.to_string_lossy()
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(not(unix))]
mod sys {
    use std::ffi::{CStr, CString};

    use crate::error::Result;

    // Rust formatting never consults the C locale, so there is nothing to
    // switch on targets without a libc locale.
    pub(super) fn query() -> Result<CString> {
        Ok(super::C_LOCALE.to_owned())
    }

    pub(super) fn set(_name: &CStr) -> Result<()> {
        Ok(())
    }
}

/// Switch the process locale under the lock. Returns false if unavailable.
#[cfg(test)]
pub(crate) fn set_for_test(name: &str) -> bool {
    let _lock = lock();
    CString::new(name)
        .ok()
        .is_some_and(|name| sys::set(&name).is_ok())
}
