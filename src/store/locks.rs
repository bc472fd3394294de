//! Per-filename mutual exclusion.
//!
//! Every load-mutate-write span in [`super::GroupStore`] holds the lock of
//! the file it touches, so two requests editing the same group serialize
//! instead of silently overwriting each other. Locks are plain
//! [`std::sync::Mutex`]es: store operations are synchronous and never hold a
//! guard across an `.await`.
//!
//! A table entry lives only while some [`FileHandle`] for it is alive, so
//! requests for files that never existed leave nothing behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AppError;

#[derive(Debug, Default)]
pub struct FileLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileLocks {
    /// The lock for `filename`, created on first use.
    pub fn handle(&self, filename: &str) -> Result<FileHandle<'_>, AppError> {
        let mut table = self.table.lock().map_err(poisoned)?;
        let lock = table
            .entry(filename.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Ok(FileHandle {
            locks: self,
            filename: filename.to_string(),
            lock: Some(lock),
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table.lock().map(|t| t.len()).unwrap_or_default()
    }
}

/// A reference to one file's lock. Dropping the last handle for a file
/// removes its table entry.
///
/// Declare the guard from [`FileHandle::acquire`] after the handle so it is
/// released first.
#[derive(Debug)]
pub struct FileHandle<'a> {
    locks: &'a FileLocks,
    filename: String,
    lock: Option<Arc<Mutex<()>>>,
}

impl FileHandle<'_> {
    /// Block until this file's lock is held.
    pub fn acquire(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        match &self.lock {
            Some(lock) => lock.lock().map_err(poisoned),
            None => Err(AppError::Io(format!(
                "file lock for {} already released",
                self.filename
            ))),
        }
    }
}

impl Drop for FileHandle<'_> {
    fn drop(&mut self) {
        let Ok(mut table) = self.locks.table.lock() else {
            return;
        };
        // Handles are only cloned under the table lock, so a count of 1 here
        // means no other handle exists.
        drop(self.lock.take());
        let unused = table
            .get(&self.filename)
            .is_some_and(|entry| Arc::strong_count(entry) == 1);
        if unused {
            table.remove(&self.filename);
        }
    }
}

fn poisoned<T>(e: PoisonError<T>) -> AppError {
    AppError::Io(format!("file lock poisoned: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_filename_shares_one_lock() {
        let locks = FileLocks::default();
        let a = locks.handle("alpha.json").expect("handle");
        let b = locks.handle("alpha.json").expect("handle");
        let _ga = a.acquire().expect("acquire a");
        assert!(b.lock.as_ref().is_some_and(|l| l.try_lock().is_err()));
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn different_filenames_do_not_block_each_other() {
        let locks = FileLocks::default();
        let a = locks.handle("alpha.json").expect("handle");
        let b = locks.handle("beta.json").expect("handle");
        let _ga = a.acquire().expect("acquire a");
        assert!(b.lock.as_ref().is_some_and(|l| l.try_lock().is_ok()));
    }

    #[test]
    fn entry_is_removed_with_the_last_handle() {
        let locks = FileLocks::default();
        let a = locks.handle("alpha.json").expect("handle");
        let b = locks.handle("alpha.json").expect("handle");
        drop(a);
        assert_eq!(locks.len(), 1);
        {
            let _guard = b.acquire().expect("acquire");
        }
        drop(b);
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn table_stays_empty_under_contention() {
        let locks = Arc::new(FileLocks::default());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let handle = locks.handle("alpha.json").expect("handle");
                        let _guard = handle.acquire().expect("acquire");
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().expect("thread");
        }
        assert_eq!(locks.len(), 0);
    }
}
