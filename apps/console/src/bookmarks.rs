#[cfg(test)]
use std::cell::RefCell;

use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use thiserror::Error;
use tracing::warn;

use crate::models::Activity;

pub const STORAGE_KEY: &str = "savedActivities";

/// The saved projection of an activity.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "Group", default)]
    pub group: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "Activity Name", default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(rename = "Third Party", default)]
    pub third_party: String,
}

impl From<&Activity> for Bookmark {
    fn from(activity: &Activity) -> Self {
        Self {
            code: activity.code.clone(),
            group: activity.group.clone(),
            category: activity.category.clone(),
            name: activity.name.clone(),
            third_party: activity.third_party.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("browser storage error: {0}")]
    Browser(#[from] gloo_storage::errors::StorageError),
    #[error("bookmark encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub trait BookmarkStorage {
    fn read(&self) -> Result<Vec<Bookmark>, StorageError>;
    fn write(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError>;
}

/// Browser local storage under [`STORAGE_KEY`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageBackend;

impl BookmarkStorage for LocalStorageBackend {
    fn read(&self) -> Result<Vec<Bookmark>, StorageError> {
        match LocalStorage::get::<Vec<Bookmark>>(STORAGE_KEY) {
            Ok(bookmarks) => Ok(bookmarks),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError> {
        LocalStorage::set(STORAGE_KEY, bookmarks)?;
        Ok(())
    }
}

/// Keeps the serialized list in memory, the way local storage would.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: RefCell<Option<String>>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn failing() -> Self {
        Self {
            raw: RefCell::new(None),
            fail_writes: true,
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

#[cfg(test)]
impl BookmarkStorage for MemoryStorage {
    fn read(&self) -> Result<Vec<Bookmark>, StorageError> {
        match self.raw.borrow().as_deref() {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Browser(
                gloo_storage::errors::StorageError::SerdeError(serde_json::Error::io(
                    std::io::Error::other("quota exceeded"),
                )),
            ));
        }
        *self.raw.borrow_mut() = Some(serde_json::to_string(bookmarks)?);
        Ok(())
    }
}

/// Ordered bookmark list, deduplicated by code.
pub struct BookmarkStore<S> {
    storage: S,
}

impl<S: BookmarkStorage> BookmarkStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Unreadable storage reads as an empty list.
    pub fn load(&self) -> Vec<Bookmark> {
        self.storage.read().unwrap_or_else(|err| {
            warn!("discarding unreadable bookmarks: {err}");
            Vec::new()
        })
    }

    #[cfg(test)]
    pub fn is_saved(&self, code: &str) -> bool {
        self.load().iter().any(|bookmark| bookmark.code == code)
    }

    /// Saves or unsaves `activity`; returns the new list and whether it is
    /// now saved.
    pub fn toggle(&self, activity: &Activity) -> (Vec<Bookmark>, bool) {
        let mut bookmarks = self.load();
        let before = bookmarks.len();
        bookmarks.retain(|bookmark| bookmark.code != activity.code);
        let saved = bookmarks.len() == before;
        if saved {
            bookmarks.push(Bookmark::from(activity));
        }
        self.persist(&bookmarks);
        (bookmarks, saved)
    }

    pub fn remove(&self, code: &str) -> Vec<Bookmark> {
        let mut bookmarks = self.load();
        let before = bookmarks.len();
        bookmarks.retain(|bookmark| bookmark.code != code);
        if bookmarks.len() != before {
            self.persist(&bookmarks);
        }
        bookmarks
    }

    /// Write failures are logged; the bookmark just does not persist.
    fn persist(&self, bookmarks: &[Bookmark]) {
        if let Err(err) = self.storage.write(bookmarks) {
            warn!("failed to persist bookmarks: {err}");
        }
    }
}

/// Two-digit counter shown next to the saved list (`"03"`, `"12"`).
pub fn count_label(count: usize) -> String {
    format!("{count:02}")
}
