//! Reconciliation rules.
//!
//! Every inbound fact, whether streamed, fetched at startup or produced by a
//! confirmed user action, arrives as a [`Signal`]. [`handle_signal`] applies it to the
//! [`TimelineStore`] and returns whether the visible state changed together with the
//! side effects to run afterwards.
//!
//! # Signal Kinds
//!
//! - **Content**: `NewStatus`, `Mentions`, `Deleted`, `StatusLiked`
//! - **Action confirmations**: `RetweetSucceeded`, `UnretweetSucceeded`,
//!   `LikeSucceeded`, `UnlikeSucceeded`, `StatusPosted`
//! - **Identity**: `SetOwner`, `OwnerUpdated`, `BlocksLoaded`, `BlockAdded`,
//!   `BlockRemoved`, `NoRetweetIds`
//! - **Connection**: `ConnectionFailure`
//! - **Presentation**: `ApiFailure`, `Rejected`, `DismissNotice`, `SelectTimeline`
//!
//! Payloads that disagree with the action they confirm are corrected locally rather
//! than reported as errors.
//!
//! # Example
//!
//! ```rust
//! use tweetline::app::{handle_signal, NotificationSettings, Signal, TimelineStore};
//! use tweetline::domain::{Status, User};
//!
//! let mut store = TimelineStore::default();
//! let signal = Signal::NewStatus { status: Status::new(1, User::new(9, "bob"), "hi"), streamed: true };
//! let (changed, _actions) = handle_signal(&mut store, &signal, &NotificationSettings::default())?;
//! assert!(changed);
//! assert_eq!(store.current_view().len(), 1);
//! # Ok::<(), tweetline::TweetlineError>(())
//! ```

use super::actions::{Action, Notification, NotificationKind, NotificationSettings};
use super::identity::BlockSet;
use super::modes::{NoticeKind, TimelineKind};
use super::state::{Notice, TimelineStore, Upsert};
use crate::domain::error::Result;
use crate::domain::{Activity, ActivityKind, Rejection, Status, StatusId, User, UserId};

/// Inbound facts consumed by the engine loop, one at a time, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A status from the stream (`streamed = true`) or the initial home fetch.
    NewStatus { status: Status, streamed: bool },

    /// Bulk mention fetch, newest first. Never notifies.
    Mentions(Vec<Status>),

    /// The retweet call returned; the payload is the new retweet wrapper.
    RetweetSucceeded(Status),

    /// The unretweet call returned; the payload is the original status.
    UnretweetSucceeded(Status),

    LikeSucceeded(Status),

    UnlikeSucceeded(Status),

    /// The service reported the status as deleted.
    Deleted(StatusId),

    /// The stream connection broke.
    ConnectionFailure,

    /// Startup mute and block lists.
    BlocksLoaded { mute: Vec<UserId>, block: Vec<UserId> },

    BlockAdded(Vec<UserId>),

    BlockRemoved(Vec<UserId>),

    /// Users whose retweets are hidden from the home timeline.
    NoRetweetIds(Vec<UserId>),

    /// The authenticated account, from the startup credential check.
    SetOwner(User),

    /// A streamed profile update. Ignored unless it is the owner's.
    OwnerUpdated(User),

    /// `actor` liked `status`.
    StatusLiked { status: Status, actor: User },

    /// A remote call failed; the message is shown as a dismissable notice.
    ApiFailure(String),

    /// A status was posted.
    StatusPosted,

    /// An intent was refused by a guard.
    Rejected(Rejection),

    DismissNotice,

    SelectTimeline(TimelineKind),
}

impl Signal {
    /// Short name used in spans and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewStatus { .. } => "new_status",
            Self::Mentions(_) => "mentions",
            Self::RetweetSucceeded(_) => "retweet_succeeded",
            Self::UnretweetSucceeded(_) => "unretweet_succeeded",
            Self::LikeSucceeded(_) => "like_succeeded",
            Self::UnlikeSucceeded(_) => "unlike_succeeded",
            Self::Deleted(_) => "deleted",
            Self::ConnectionFailure => "connection_failure",
            Self::BlocksLoaded { .. } => "blocks_loaded",
            Self::BlockAdded(_) => "block_added",
            Self::BlockRemoved(_) => "block_removed",
            Self::NoRetweetIds(_) => "no_retweet_ids",
            Self::SetOwner(_) => "set_owner",
            Self::OwnerUpdated(_) => "owner_updated",
            Self::StatusLiked { .. } => "status_liked",
            Self::ApiFailure(_) => "api_failure",
            Self::StatusPosted => "status_posted",
            Self::Rejected(_) => "rejected",
            Self::DismissNotice => "dismiss_notice",
            Self::SelectTimeline(_) => "select_timeline",
        }
    }
}

/// Applies one signal to the store.
///
/// Returns `(changed, actions)`: `changed` is true when a reader of
/// [`TimelineStore::snapshot`] would see something different, and `actions` are the
/// side effects to execute once the mutation is committed.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the engine loop uniform with the other
/// signal sources, which log and continue on error.
///
/// # Example
///
/// ```rust
/// use tweetline::app::{handle_signal, NotificationSettings, Signal, TimelineStore};
///
/// let mut store = TimelineStore::default();
/// let settings = NotificationSettings::default();
/// handle_signal(&mut store, &Signal::ConnectionFailure, &settings)?;
/// let (changed, _) = handle_signal(&mut store, &Signal::ConnectionFailure, &settings)?;
/// assert!(!changed);
/// # Ok::<(), tweetline::TweetlineError>(())
/// ```
#[allow(clippy::too_many_lines)]
pub fn handle_signal(
    store: &mut TimelineStore,
    signal: &Signal,
    notifications: &NotificationSettings,
) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_signal", signal = signal.kind()).entered();

    match signal {
        Signal::NewStatus { status, streamed } => {
            Ok(apply_new_status(store, status, *streamed, notifications))
        }
        Signal::Mentions(batch) => {
            let blocked = &store.identity.blocked;
            let accepted: Vec<Status> = batch
                .iter()
                .filter(|s| !is_blocked(blocked, s))
                .cloned()
                .collect();
            let added = store.mention.prepend_absent(accepted);
            tracing::debug!(fetched = batch.len(), added, "mentions merged");
            Ok((added > 0, vec![]))
        }
        Signal::RetweetSucceeded(payload) => {
            let mut main = payload.main_status().clone();
            if !main.retweeted {
                tracing::debug!(status_id = main.id, "correcting retweet flag");
                main.retweeted = true;
                main.retweet_count += 1;
            }
            Ok((replace_everywhere(store, &main), vec![]))
        }
        Signal::UnretweetSucceeded(payload) => {
            let mut main = payload.main_status().clone();
            if main.retweeted {
                tracing::debug!(status_id = main.id, "correcting unretweet flag");
                main.retweeted = false;
                main.retweet_count = main.retweet_count.saturating_sub(1);
            }
            Ok((replace_everywhere(store, &main), vec![]))
        }
        Signal::LikeSucceeded(payload) | Signal::UnlikeSucceeded(payload) => {
            let main = payload.main_status().clone();
            Ok((replace_everywhere(store, &main), vec![]))
        }
        Signal::Deleted(id) => {
            let removed: usize = store
                .both_mut()
                .into_iter()
                .map(|tl| tl.remove_status(*id))
                .sum();
            if removed == 0 {
                tracing::trace!(status_id = id, "deleted status not present");
            }
            Ok((removed > 0, vec![]))
        }
        Signal::ConnectionFailure => {
            let inserted = store
                .both_mut()
                .into_iter()
                .map(super::state::Timeline::push_separator)
                .fold(false, |acc, pushed| acc | pushed);
            tracing::debug!(inserted, "connection failure marked");
            Ok((inserted, vec![]))
        }
        Signal::BlocksLoaded { mute, block } => {
            store.identity.blocked = BlockSet::from_lists(mute, block);
            tracing::debug!(
                mute = mute.len(),
                block = block.len(),
                total = store.identity.blocked.len(),
                "block set loaded"
            );
            Ok((false, vec![]))
        }
        Signal::BlockAdded(ids) => {
            let added = store.identity.blocked.add(ids);
            tracing::debug!(added, total = store.identity.blocked.len(), "block set extended");
            Ok((false, vec![]))
        }
        Signal::BlockRemoved(ids) => {
            let removed = store.identity.blocked.remove(ids);
            tracing::debug!(removed, total = store.identity.blocked.len(), "block set reduced");
            Ok((false, vec![]))
        }
        Signal::NoRetweetIds(ids) => {
            store.identity.no_retweets = ids.iter().copied().collect();
            Ok((false, vec![]))
        }
        Signal::SetOwner(user) => {
            tracing::debug!(owner_id = user.id, screen_name = %user.screen_name, "owner set");
            store.identity.owner = Some(user.clone());
            Ok((true, vec![]))
        }
        Signal::OwnerUpdated(user) => {
            if !store.identity.is_owner(user.id) {
                return Ok((false, vec![]));
            }
            store.identity.owner = Some(user.clone());
            Ok((true, vec![]))
        }
        Signal::StatusLiked { status, actor } => {
            Ok(apply_status_liked(store, status, actor, notifications))
        }
        Signal::ApiFailure(message) => {
            tracing::debug!(message = %message, "api failure");
            store.notice = Some(Notice::new(NoticeKind::Error, format!("API error: {message}")));
            Ok((true, vec![]))
        }
        Signal::StatusPosted => {
            store.notice = Some(Notice::new(NoticeKind::Info, "Tweeted!"));
            Ok((true, vec![]))
        }
        Signal::Rejected(rejection) => {
            tracing::debug!(rejection = %rejection, "intent rejected");
            store.notice = Some(Notice::new(NoticeKind::Error, rejection.to_string()));
            Ok((true, vec![]))
        }
        Signal::DismissNotice => Ok((store.notice.take().is_some(), vec![])),
        Signal::SelectTimeline(kind) => Ok((store.select(*kind), vec![])),
    }
}

fn is_blocked(blocked: &BlockSet, status: &Status) -> bool {
    status.any_author(|id| blocked.contains(id))
}

fn replace_everywhere(store: &mut TimelineStore, updated: &Status) -> bool {
    let touched: usize = store
        .both_mut()
        .into_iter()
        .map(|tl| tl.replace_main(updated))
        .sum();
    tracing::debug!(status_id = updated.id, touched, "status replaced");
    touched > 0
}

fn apply_new_status(
    store: &mut TimelineStore,
    status: &Status,
    streamed: bool,
    notifications: &NotificationSettings,
) -> (bool, Vec<Action>) {
    if is_blocked(&store.identity.blocked, status) {
        tracing::debug!(status_id = status.id, author = status.user.id, "blocked author discarded");
        return (false, vec![]);
    }

    let mut changed = false;
    let mut fresh = true;

    let hidden_retweet =
        status.is_retweet() && store.identity.no_retweets.contains(&status.user.id);
    if hidden_retweet {
        tracing::debug!(status_id = status.id, "retweet hidden by no-retweet list");
        fresh = false;
    } else {
        let outcome = store.home.upsert_front(status.clone());
        tracing::debug!(status_id = status.main_status().id, outcome = ?outcome, "home updated");
        changed = true;
        fresh = outcome == Upsert::Inserted;
    }

    let mut actions = vec![];
    if fresh {
        actions.push(Action::CacheHistory {
            accounts: status.referenced_accounts(),
            hashtags: status.hashtags(),
        });
    }

    let Some(owner) = store.identity.owner_id() else {
        return (changed, actions);
    };

    if status.mentions(owner) {
        let outcome = store.mention.upsert_front(status.clone());
        tracing::debug!(status_id = status.id, outcome = ?outcome, "mentions updated");
        changed = true;
    }

    if streamed && fresh {
        if let Some(kind) = notification_kind(status, owner).filter(|k| notifications.enabled(*k)) {
            actions.push(Action::Notify(Notification {
                kind,
                actor: status.user.clone(),
                status: status.clone(),
            }));
        }
    }

    (changed, actions)
}

/// What, if anything, `status` did to the owner.
fn notification_kind(status: &Status, owner: UserId) -> Option<NotificationKind> {
    if status.user.id == owner {
        return None;
    }
    if status.in_reply_to_user_id == Some(owner) {
        return Some(NotificationKind::Reply);
    }
    if status.is_retweet() && status.main_status().user.id == owner {
        return Some(NotificationKind::Retweet);
    }
    if status
        .quoted_status
        .as_ref()
        .is_some_and(|quoted| quoted.user.id == owner)
    {
        return Some(NotificationKind::Quoted);
    }
    None
}

fn apply_status_liked(
    store: &mut TimelineStore,
    status: &Status,
    actor: &User,
    notifications: &NotificationSettings,
) -> (bool, Vec<Action>) {
    if store.identity.blocked.contains(actor.id) {
        tracing::debug!(actor = actor.id, "like from blocked user discarded");
        return (false, vec![]);
    }

    if store.identity.is_owner(actor.id) {
        let main = status.main_status().clone();
        return (replace_everywhere(store, &main), vec![]);
    }

    if !store.identity.is_owner(status.main_status().user.id) {
        return (false, vec![]);
    }

    store.home.push_activity(Activity {
        kind: ActivityKind::Liked,
        status: status.main_status().clone(),
        actor: actor.clone(),
    });

    let mut actions = vec![];
    if notifications.enabled(NotificationKind::Liked) {
        actions.push(Action::Notify(Notification {
            kind: NotificationKind::Liked,
            actor: actor.clone(),
            status: status.main_status().clone(),
        }));
    }
    (true, actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimelineItem, UserMention};
    use std::collections::HashSet;

    const OWNER: UserId = 7;

    fn settings() -> NotificationSettings {
        NotificationSettings::default()
    }

    fn store_with_owner() -> TimelineStore {
        let mut store = TimelineStore::default();
        store.identity.owner = Some(User::new(OWNER, "owner"));
        store
    }

    fn status(id: StatusId, author: UserId) -> Status {
        Status::new(id, User::new(author, format!("user{author}")), format!("status {id}"))
    }

    fn apply(store: &mut TimelineStore, signal: Signal) -> (bool, Vec<Action>) {
        handle_signal(store, &signal, &settings()).unwrap()
    }

    fn new_status(status: Status) -> Signal {
        Signal::NewStatus { status, streamed: true }
    }

    fn assert_unique(store: &TimelineStore) {
        for kind in [TimelineKind::Home, TimelineKind::Mention] {
            let ids: Vec<_> = store.timeline(kind).iter().filter_map(TimelineItem::status_id).collect();
            let unique: HashSet<_> = ids.iter().collect();
            assert_eq!(ids.len(), unique.len(), "duplicate ids in {kind:?}: {ids:?}");
        }
    }

    fn assert_no_adjacent_separators(store: &TimelineStore) {
        for kind in [TimelineKind::Home, TimelineKind::Mention] {
            let items: Vec<_> = store.timeline(kind).iter().collect();
            for pair in items.windows(2) {
                assert!(!(pair[0].is_separator() && pair[1].is_separator()));
            }
        }
    }

    #[test]
    fn duplicate_with_favorited_replaces() {
        let mut store = store_with_owner();
        apply(&mut store, new_status(status(1, 42)));
        let mut liked = status(1, 42);
        liked.favorited = true;
        apply(&mut store, new_status(liked));

        assert_eq!(store.home.len(), 1);
        assert!(store.home.find_status(1).is_some_and(|s| s.favorited));
    }

    #[test]
    fn repeated_mention_updates_both_timelines() {
        let mut store = store_with_owner();
        let mut mention = status(2, 9);
        mention.entities.user_mentions.push(UserMention { id: OWNER, screen_name: "owner".into() });
        apply(&mut store, new_status(mention.clone()));

        mention.favorited = true;
        let (changed, actions) = apply(&mut store, new_status(mention));

        assert!(changed);
        assert!(actions.is_empty());
        assert_eq!(store.mention.len(), 1);
        assert!(store.home.find_status(2).is_some_and(|s| s.favorited));
        assert!(store.mention.find_status(2).is_some_and(|s| s.favorited));
    }

    #[test]
    fn uniqueness_holds_across_retweets_and_repeats() {
        let mut store = store_with_owner();
        let original = status(1, 42);
        let sequence = vec![
            original.clone(),
            Status::retweet_of(2, User::new(9, "bob"), original.clone()),
            status(3, 9),
            Status::retweet_of(4, User::new(10, "carol"), original),
            status(3, 9),
        ];
        for s in sequence {
            apply(&mut store, new_status(s));
            assert_unique(&store);
        }
        assert_eq!(store.home.len(), 2);
    }

    #[test]
    fn owner_mentioned_lands_in_both_timelines() {
        let mut store = store_with_owner();
        let mut s = status(2, 9);
        s.entities.user_mentions.push(UserMention { id: OWNER, screen_name: "owner".into() });

        let (changed, _) = apply(&mut store, new_status(s));

        assert!(changed);
        assert!(store.home.contains_status(2));
        assert!(store.mention.contains_status(2));
    }

    #[test]
    fn blocked_authors_never_appear() {
        let mut store = store_with_owner();
        apply(&mut store, Signal::BlocksLoaded { mute: vec![5], block: vec![6] });

        apply(&mut store, new_status(status(1, 5)));
        apply(&mut store, new_status(Status::retweet_of(2, User::new(9, "bob"), status(3, 6))));
        apply(&mut store, Signal::Mentions(vec![status(4, 6)]));

        apply(&mut store, Signal::BlockAdded(vec![9]));
        apply(&mut store, new_status(status(5, 9)));

        assert!(store.home.is_empty());
        assert!(store.mention.is_empty());

        apply(&mut store, Signal::BlockRemoved(vec![9]));
        apply(&mut store, new_status(status(6, 9)));
        assert_eq!(store.home.len(), 1);
    }

    #[test]
    fn block_updates_are_forward_looking() {
        let mut store = store_with_owner();
        apply(&mut store, new_status(status(1, 9)));
        let (changed, _) = apply(&mut store, Signal::BlockAdded(vec![9]));
        assert!(!changed);
        assert!(store.home.contains_status(1));
    }

    #[test]
    fn retweet_confirmation_corrects_flag_and_count() {
        let mut store = store_with_owner();
        let mut original = status(1, 42);
        original.retweet_count = 3;
        apply(&mut store, new_status(original.clone()));

        let wrapper = Status::retweet_of(100, User::new(OWNER, "owner"), original);
        apply(&mut store, Signal::RetweetSucceeded(wrapper));

        let updated = store.home.find_status(1).unwrap();
        assert!(updated.retweeted);
        assert_eq!(updated.retweet_count, 4);
    }

    #[test]
    fn retweet_confirmation_trusts_consistent_payload() {
        let mut store = store_with_owner();
        apply(&mut store, new_status(status(1, 42)));
        let mut confirmed = status(1, 42);
        confirmed.retweeted = true;
        confirmed.retweet_count = 10;
        let wrapper = Status::retweet_of(100, User::new(OWNER, "owner"), confirmed);
        apply(&mut store, Signal::RetweetSucceeded(wrapper));

        assert_eq!(store.home.find_status(1).unwrap().retweet_count, 10);
    }

    #[test]
    fn unretweet_confirmation_corrects_stale_payload() {
        let mut store = store_with_owner();
        let mut stale = status(1, 42);
        stale.retweeted = true;
        stale.retweet_count = 4;
        apply(&mut store, new_status(stale.clone()));

        apply(&mut store, Signal::UnretweetSucceeded(stale));

        let updated = store.home.find_status(1).unwrap();
        assert!(!updated.retweeted);
        assert_eq!(updated.retweet_count, 3);
    }

    #[test]
    fn like_applied_twice_equals_once() {
        let mut store = store_with_owner();
        let mut mention = status(1, 42);
        mention.in_reply_to_user_id = Some(OWNER);
        apply(&mut store, new_status(mention.clone()));

        let mut liked = mention;
        liked.favorited = true;
        liked.favorite_count = 1;

        apply(&mut store, Signal::LikeSucceeded(liked.clone()));
        let once = (store.home.clone(), store.mention.clone());
        apply(&mut store, Signal::LikeSucceeded(liked));
        assert_eq!(once, (store.home.clone(), store.mention.clone()));
        assert!(store.mention.find_status(1).is_some_and(|s| s.favorited));
    }

    #[test]
    fn like_updates_retweet_wrappers_in_place() {
        let mut store = store_with_owner();
        let original = status(1, 42);
        apply(&mut store, new_status(Status::retweet_of(2, User::new(9, "bob"), original.clone())));

        let mut liked = original;
        liked.favorited = true;
        apply(&mut store, Signal::LikeSucceeded(liked));

        let entry = store.home.iter().next().and_then(TimelineItem::as_status).unwrap();
        assert_eq!(entry.id, 2);
        assert!(entry.main_status().favorited);
    }

    #[test]
    fn deletion_removes_everywhere_and_tolerates_absence() {
        let mut store = store_with_owner();
        let mut s = status(1, 42);
        s.in_reply_to_user_id = Some(OWNER);
        apply(&mut store, new_status(s.clone()));
        apply(&mut store, new_status(Status::retweet_of(2, User::new(9, "bob"), status(3, 42))));
        apply(
            &mut store,
            Signal::StatusLiked { status: status(4, OWNER), actor: User::new(9, "bob") },
        );

        let (changed, _) = apply(&mut store, Signal::Deleted(1));
        assert!(changed);
        assert!(!store.home.contains_status(1));
        assert!(!store.mention.contains_status(1));

        apply(&mut store, Signal::Deleted(3));
        apply(&mut store, Signal::Deleted(4));
        assert!(store.home.is_empty());

        let (changed, _) = apply(&mut store, Signal::Deleted(999));
        assert!(!changed);
    }

    #[test]
    fn connection_failures_never_stack_separators() {
        let mut store = store_with_owner();
        apply(&mut store, new_status(status(1, 9)));
        apply(&mut store, Signal::ConnectionFailure);
        apply(&mut store, Signal::ConnectionFailure);
        apply(&mut store, new_status(status(2, 9)));
        apply(&mut store, Signal::ConnectionFailure);
        apply(&mut store, Signal::Deleted(2));

        assert_no_adjacent_separators(&store);
        assert_eq!(store.mention.len(), 1);
    }

    #[test]
    fn bulk_mentions_skip_present_and_never_notify() {
        let mut store = store_with_owner();
        let mut streamed = status(1, 9);
        streamed.in_reply_to_user_id = Some(OWNER);
        apply(&mut store, new_status(streamed.clone()));

        let mut fetched = status(2, 9);
        fetched.in_reply_to_user_id = Some(OWNER);
        let (_, actions) = apply(&mut store, Signal::Mentions(vec![fetched, streamed]));

        assert!(actions.is_empty());
        assert_eq!(store.mention.len(), 2);
    }

    #[test]
    fn streamed_reply_notifies_but_fetched_does_not() {
        let mut store = store_with_owner();
        let mut reply = status(1, 9);
        reply.in_reply_to_user_id = Some(OWNER);

        let (_, actions) = apply(&mut store, new_status(reply.clone()));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::Notify(Notification { kind: NotificationKind::Reply, .. })
        )));

        let mut other = reply;
        other.id = 2;
        let (_, actions) = apply(&mut store, Signal::NewStatus { status: other, streamed: false });
        assert!(!actions.iter().any(|a| matches!(a, Action::Notify(_))));
    }

    #[test]
    fn retweet_and_quote_of_owner_notify_when_enabled() {
        let mut store = store_with_owner();
        let rt = Status::retweet_of(2, User::new(9, "bob"), status(1, OWNER));
        let (_, actions) = apply(&mut store, new_status(rt));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::Notify(Notification { kind: NotificationKind::Retweet, .. })
        )));

        let mut quote = status(3, 9);
        quote.quoted_status = Some(Box::new(status(1, OWNER)));
        let quiet = NotificationSettings { quoted: false, ..NotificationSettings::default() };
        let (_, actions) =
            handle_signal(&mut store, &new_status(quote), &quiet).unwrap();
        assert!(!actions.iter().any(|a| matches!(a, Action::Notify(_))));
    }

    #[test]
    fn accepted_status_feeds_history_cache() {
        let mut store = store_with_owner();
        let mut s = status(1, 9);
        s.entities.hashtags.push(crate::domain::Hashtag { text: "rust".into() });
        let (_, actions) = apply(&mut store, new_status(s));
        assert!(actions.contains(&Action::CacheHistory {
            accounts: vec![User::new(9, "user9")],
            hashtags: vec!["rust".into()],
        }));
    }

    #[test]
    fn no_retweet_users_are_hidden_from_home() {
        let mut store = store_with_owner();
        apply(&mut store, Signal::NoRetweetIds(vec![9]));
        apply(&mut store, new_status(Status::retweet_of(2, User::new(9, "bob"), status(1, 42))));
        apply(&mut store, new_status(status(3, 9)));

        assert_eq!(store.home.len(), 1);
        assert!(store.home.contains_status(3));
    }

    #[test]
    fn hidden_retweet_raises_no_actions() {
        let mut store = store_with_owner();
        apply(&mut store, Signal::NoRetweetIds(vec![9]));

        let (changed, actions) = apply(
            &mut store,
            new_status(Status::retweet_of(2, User::new(9, "bob"), status(1, OWNER))),
        );

        assert!(!changed);
        assert!(actions.is_empty());
        assert!(store.home.is_empty());
    }

    #[test]
    fn liked_activity_for_owner_status() {
        let mut store = store_with_owner();
        let (changed, actions) = apply(
            &mut store,
            Signal::StatusLiked { status: status(1, OWNER), actor: User::new(9, "bob") },
        );
        assert!(changed);
        assert!(matches!(store.home.front(), Some(TimelineItem::Activity(_))));
        assert_eq!(actions.len(), 1);

        apply(&mut store, Signal::BlockAdded(vec![10]));
        let (changed, _) = apply(
            &mut store,
            Signal::StatusLiked { status: status(1, OWNER), actor: User::new(10, "carol") },
        );
        assert!(!changed);
        assert_eq!(store.home.len(), 1);
    }

    #[test]
    fn owner_liking_updates_flags() {
        let mut store = store_with_owner();
        apply(&mut store, new_status(status(1, 42)));
        let mut liked = status(1, 42);
        liked.favorited = true;
        apply(
            &mut store,
            Signal::StatusLiked { status: liked, actor: User::new(OWNER, "owner") },
        );
        assert!(store.home.find_status(1).is_some_and(|s| s.favorited));
        assert_eq!(store.home.len(), 1);
    }

    #[test]
    fn notices_raise_and_dismiss() {
        let mut store = store_with_owner();
        apply(&mut store, Signal::ApiFailure("rate limited".into()));
        assert_eq!(store.notice().map(|n| n.text.as_str()), Some("API error: rate limited"));

        apply(&mut store, Signal::Rejected(Rejection::OwnStatus));
        assert_eq!(store.notice().map(|n| n.kind), Some(NoticeKind::Error));

        apply(&mut store, Signal::StatusPosted);
        assert_eq!(store.notice().map(|n| n.text.as_str()), Some("Tweeted!"));

        let (changed, _) = apply(&mut store, Signal::DismissNotice);
        assert!(changed);
        assert!(store.notice().is_none());
    }

    #[test]
    fn owner_update_ignores_other_users() {
        let mut store = store_with_owner();
        let (changed, _) = apply(&mut store, Signal::OwnerUpdated(User::new(9, "bob")));
        assert!(!changed);

        let mut renamed = User::new(OWNER, "owner");
        renamed.name = "New Name".into();
        apply(&mut store, Signal::OwnerUpdated(renamed));
        assert_eq!(store.identity().owner.as_ref().map(|u| u.name.as_str()), Some("New Name"));
    }
}
