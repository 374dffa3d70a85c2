//! Authenticated account and suppressed-user sets.
//!
//! [`BlockSet`] is the union of the remote mute and block lists. It is populated once
//! at startup and then nudged by streamed add/remove notices. It only filters what
//! arrives afterwards; items already in a timeline stay put.

use crate::domain::{User, UserId};
use std::collections::HashSet;

/// Set of user ids whose statuses are suppressed.
///
/// # Example
///
/// ```rust
/// use tweetline::app::BlockSet;
///
/// let mut blocks = BlockSet::from_lists(&[1, 2], &[2, 3]);
/// assert_eq!(blocks.len(), 3);
/// blocks.remove(&[2]);
/// assert!(!blocks.contains(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSet {
    ids: HashSet<UserId>,
}

impl BlockSet {
    /// Merges a mute list and a block list, deduplicated.
    #[must_use]
    pub fn from_lists(mute_ids: &[UserId], block_ids: &[UserId]) -> Self {
        Self {
            ids: mute_ids.iter().chain(block_ids).copied().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: UserId) -> bool {
        self.ids.contains(&id)
    }

    /// Adds ids, returning how many were new.
    pub fn add(&mut self, ids: &[UserId]) -> usize {
        ids.iter().filter(|id| self.ids.insert(**id)).count()
    }

    /// Removes ids, returning how many were present.
    pub fn remove(&mut self, ids: &[UserId]) -> usize {
        ids.iter().filter(|id| self.ids.remove(*id)).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The authenticated account plus the user sets that shape what it sees.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    /// Account the session is authenticated as; `None` until the account fetch lands.
    pub owner: Option<User>,

    /// Muted and blocked users.
    pub blocked: BlockSet,

    /// Users whose retweets are hidden from the home timeline.
    pub no_retweets: HashSet<UserId>,
}

impl Identity {
    #[must_use]
    pub fn owner_id(&self) -> Option<UserId> {
        self.owner.as_ref().map(|u| u.id)
    }

    #[must_use]
    pub fn is_owner(&self, id: UserId) -> bool {
        self.owner_id() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_dedups_and_counts_changes() {
        let mut set = BlockSet::from_lists(&[5, 6], &[6, 7]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.add(&[7, 8]), 1);
        assert_eq!(set.remove(&[5, 99]), 1);
        assert!(set.contains(8));
        assert!(!set.contains(5));
    }

    #[test]
    fn owner_lookup() {
        let mut identity = Identity::default();
        assert!(!identity.is_owner(7));
        identity.owner = Some(User::new(7, "owner"));
        assert!(identity.is_owner(7));
        assert_eq!(identity.owner_id(), Some(7));
    }
}
