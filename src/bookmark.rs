//! Bookmark store: named camera snapshots.
//!
//! A bookmark's position and range are fixed once captured; only the name
//! and description can be edited. List order is the tour order and changes
//! only through add, remove, and [`BookmarkStore::reorder`].

#[cfg(test)]
#[path = "bookmark_test.rs"]
mod bookmark_test;

use std::time::{SystemTime, UNIX_EPOCH};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::animation::Waypoint;
use crate::camera::Camera;
use crate::precision::{Scalar, Vector2};

/// A named, persisted camera snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub name: String,
    pub pos: Vector2,
    pub range: Scalar,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: String,
    pub description: String,
}

impl Bookmark {
    /// Camera destination for this bookmark.
    #[must_use]
    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.pos.clone(), self.range.clone())
    }

    fn matches(&self, patterns: &[Regex]) -> bool {
        patterns.iter().all(|re| re.is_match(&self.name) || re.is_match(&self.description))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkStore {
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted list, keeping its order.
    #[must_use]
    pub fn from_list(bookmarks: Vec<Bookmark>) -> Self {
        Self { bookmarks }
    }

    /// Capture the camera's current view as a new bookmark at the end of the
    /// list. `None` or a blank name becomes `"Bookmark {n}"`.
    pub fn add(&mut self, camera: &Camera, name: Option<&str>) -> &Bookmark {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => format!("Bookmark {}", self.bookmarks.len() + 1),
        };
        let index = self.bookmarks.len();
        self.bookmarks.push(Bookmark {
            id: Uuid::new_v4().to_string(),
            name,
            pos: camera.pos.clone(),
            range: camera.range.clone(),
            timestamp: now_ms().to_string(),
            description: String::new(),
        });
        &self.bookmarks[index]
    }

    /// Rename a bookmark. Unknown ids are ignored.
    pub fn edit(&mut self, id: &str, name: &str) -> bool {
        let Some(bookmark) = self.find_mut(id, "edit") else {
            return false;
        };
        name.trim().clone_into(&mut bookmark.name);
        true
    }

    /// Replace a bookmark's description. Unknown ids are ignored.
    pub fn describe(&mut self, id: &str, description: &str) -> bool {
        let Some(bookmark) = self.find_mut(id, "describe") else {
            return false;
        };
        description.clone_into(&mut bookmark.description);
        true
    }

    /// Delete by id. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> Option<Bookmark> {
        let Some(index) = self.index_of(id) else {
            warn!(id, "remove: unknown bookmark");
            return None;
        };
        Some(self.bookmarks.remove(index))
    }

    /// Move the bookmark at `from` so it ends up at `to`. Out-of-range indices
    /// are ignored.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.bookmarks.len();
        if from >= len || to >= len {
            warn!(from, to, len, "reorder: index out of range");
            return false;
        }
        if from != to {
            let bookmark = self.bookmarks.remove(from);
            self.bookmarks.insert(to, bookmark);
        }
        true
    }

    /// Bookmarks whose name or description matches every whitespace-separated
    /// token, case-insensitively. `*` inside a token matches any run of
    /// characters. A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Bookmark> {
        let mut patterns = Vec::new();
        for token in query.split_whitespace() {
            match token_pattern(token) {
                Ok(re) => patterns.push(re),
                Err(e) => {
                    warn!(token, error = %e, "search: token did not compile");
                    return Vec::new();
                }
            }
        }
        self.bookmarks.iter().filter(|b| b.matches(&patterns)).collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.bookmarks.iter().position(|b| b.id == id)
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Bookmark> {
        self.bookmarks.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    fn find_mut(&mut self, id: &str, op: &'static str) -> Option<&mut Bookmark> {
        let found = self.bookmarks.iter_mut().find(|b| b.id == id);
        if found.is_none() {
            warn!(id, op, "unknown bookmark");
        }
        found
    }
}

/// Escape a search token, turning each `*` into `.*`.
fn token_pattern(token: &str) -> Result<Regex, regex::Error> {
    let pattern = token.split('*').map(regex::escape).collect::<Vec<_>>().join(".*");
    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
