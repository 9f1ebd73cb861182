//! Scoped environment overrides for tests that exercise [`crate::Config::from_env`].

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Holds the process-wide environment lock and undoes every override made
/// through it when dropped, newest first.
#[derive(Debug)]
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Wait for exclusive use of the environment. A lock poisoned by a
    /// panicking test is reclaimed.
    pub fn lock() -> Self {
        Self {
            saved: Vec::new(),
            _lock: env_lock().lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.remember(key);
        // SAFETY: mutation is serialized by the lock held in `self`.
        #[allow(unused_unsafe)]
        unsafe {
            std::env::set_var(key, value);
        }
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.remember(key);
        // SAFETY: mutation is serialized by the lock held in `self`.
        #[allow(unused_unsafe)]
        unsafe {
            std::env::remove_var(key);
        }
        self
    }

    fn remember(&mut self, key: &str) {
        self.saved.push((key.to_string(), std::env::var(key).ok()));
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: the lock is still held; `_lock` drops after this body.
            #[allow(unused_unsafe)]
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(&key, value),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScopedEnv;

    const KEY: &str = "LINEPAD_TEST_SCOPED_ENV";

    #[test]
    fn overrides_unwind_in_reverse() {
        let mut outer = ScopedEnv::lock();
        outer.set(KEY, "before");
        drop(outer);
        assert_eq!(std::env::var(KEY).ok(), None);

        let mut env = ScopedEnv::lock();
        env.set(KEY, "one").set(KEY, "two");
        assert_eq!(std::env::var(KEY).ok().as_deref(), Some("two"));
        env.remove(KEY);
        assert!(std::env::var(KEY).is_err());
        drop(env);
        assert!(std::env::var(KEY).is_err());
    }
}
