//! Timeline storage and view selection.
//!
//! This module defines [`Timeline`], an ordered newest-first sequence of
//! [`TimelineItem`]s, and [`TimelineStore`], which holds the home and mention timelines,
//! the identity they are filtered against, the selected view and the current notice.
//!
//! # Invariants
//!
//! - **Uniqueness**: no two `Status` entries of one timeline resolve to the same
//!   main-status id. Inserting a known id replaces the entry where it stands.
//! - **Discontinuity**: no two adjacent entries are separators.
//!
//! Mutation entry points are crate-private; the reconciliation handler is the only
//! writer. Readers get a [`TimelineSnapshot`] copy.
//!
//! # Example
//!
//! ```rust
//! use tweetline::app::{TimelineKind, TimelineStore};
//!
//! let mut store = TimelineStore::default();
//! assert!(store.select(TimelineKind::Mention));
//! assert!(store.current_view().is_empty());
//! ```

use super::identity::Identity;
use super::modes::{NoticeKind, TimelineKind};
use crate::domain::{Activity, Status, StatusId, TimelineItem, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Outcome of an insert-or-replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Newest-first sequence of timeline items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    items: VecDeque<TimelineItem>,
}

impl Timeline {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn front(&self) -> Option<&TimelineItem> {
        self.items.front()
    }

    /// Index of the status entry resolving to `id`.
    #[must_use]
    pub fn position_of(&self, id: StatusId) -> Option<usize> {
        self.items.iter().position(|item| item.status_id() == Some(id))
    }

    #[must_use]
    pub fn contains_status(&self, id: StatusId) -> bool {
        self.position_of(id).is_some()
    }

    /// Status entry resolving to `id`.
    #[must_use]
    pub fn find_status(&self, id: StatusId) -> Option<&Status> {
        self.items
            .iter()
            .filter_map(TimelineItem::as_status)
            .find(|s| s.main_status().id == id)
    }

    /// Replaces the entry resolving to the same id in place, or inserts at the front.
    pub(crate) fn upsert_front(&mut self, status: Status) -> Upsert {
        match self.position_of(status.main_status().id) {
            Some(idx) => {
                self.items[idx] = TimelineItem::Status(status);
                Upsert::Replaced
            }
            None => {
                self.items.push_front(TimelineItem::Status(status));
                Upsert::Inserted
            }
        }
    }

    /// Prepends a newest-first batch, skipping ids already present.
    ///
    /// Returns the number of statuses added.
    pub(crate) fn prepend_absent(&mut self, batch: Vec<Status>) -> usize {
        let mut added: Vec<Status> = Vec::with_capacity(batch.len());
        for status in batch {
            let id = status.main_status().id;
            if self.contains_status(id) || added.iter().any(|s| s.main_status().id == id) {
                continue;
            }
            added.push(status);
        }
        let count = added.len();
        for status in added.into_iter().rev() {
            self.items.push_front(TimelineItem::Status(status));
        }
        count
    }

    /// Overwrites the main status of every entry resolving to `updated.id`.
    ///
    /// Retweet wrappers keep their own identity and only swap the wrapped status.
    /// Returns the number of entries touched.
    pub(crate) fn replace_main(&mut self, updated: &Status) -> usize {
        let mut touched = 0;
        for item in &mut self.items {
            if let TimelineItem::Status(s) = item {
                if s.main_status().id == updated.id {
                    s.replace_main(updated);
                    touched += 1;
                }
            }
        }
        touched
    }

    /// Removes every entry resolving to `id`, activities included.
    ///
    /// Separators that become adjacent are collapsed. Returns the number removed.
    pub(crate) fn remove_status(&mut self, id: StatusId) -> usize {
        let before = self.items.len();
        let mut removed = 0;
        let mut prev_separator = false;
        self.items.retain(|item| {
            if item.refers_to() == Some(id) {
                removed += 1;
                return false;
            }
            let separator = item.is_separator();
            let keep = !(separator && prev_separator);
            if keep {
                prev_separator = separator;
            }
            keep
        });
        tracing::trace!(before, after = self.items.len(), removed, "timeline filtered");
        removed
    }

    /// Inserts a separator at the front unless the front already is one.
    pub(crate) fn push_separator(&mut self) -> bool {
        if self.front().is_some_and(TimelineItem::is_separator) {
            return false;
        }
        self.items.push_front(TimelineItem::Separator);
        true
    }

    pub(crate) fn push_activity(&mut self, activity: Activity) {
        self.items.push_front(TimelineItem::Activity(activity));
    }
}

/// A transient, dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    #[must_use]
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Home and mention timelines plus everything they are reconciled against.
#[derive(Debug, Clone, Default)]
pub struct TimelineStore {
    pub(crate) home: Timeline,
    pub(crate) mention: Timeline,
    pub(crate) current: TimelineKind,
    pub(crate) identity: Identity,
    pub(crate) notice: Option<Notice>,
    pub(crate) revision: u64,
}

impl TimelineStore {
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    /// The timeline selected by the view switch.
    #[must_use]
    pub const fn current_view(&self) -> &Timeline {
        self.timeline(self.current)
    }

    #[must_use]
    pub const fn timeline(&self, kind: TimelineKind) -> &Timeline {
        match kind {
            TimelineKind::Home => &self.home,
            TimelineKind::Mention => &self.mention,
        }
    }

    #[must_use]
    pub const fn current_kind(&self) -> TimelineKind {
        self.current
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Number of committed mutations so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Swaps the active view. Returns whether the selection changed.
    pub fn select(&mut self, kind: TimelineKind) -> bool {
        if self.current == kind {
            return false;
        }
        self.current = kind;
        true
    }

    /// Looks a status up by resolved id, home timeline first.
    #[must_use]
    pub fn find_status(&self, id: StatusId) -> Option<&Status> {
        self.home
            .find_status(id)
            .or_else(|| self.mention.find_status(id))
    }

    /// Copies the active view for a reader.
    #[must_use]
    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            kind: self.current,
            items: self.current_view().iter().cloned().collect(),
            owner: self.identity.owner.clone(),
            notice: self.notice.clone(),
            revision: self.revision,
        }
    }

    pub(crate) fn both_mut(&mut self) -> [&mut Timeline; 2] {
        [&mut self.home, &mut self.mention]
    }
}

/// Read-only copy of the active timeline handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineSnapshot {
    pub kind: TimelineKind,
    pub items: Vec<TimelineItem>,
    pub owner: Option<User>,
    pub notice: Option<Notice>,
    pub revision: u64,
}
