//! Presence registry: the single source of truth for "who is online".
//!
//! Entries are never removed. A user going offline flips `is_online`, because
//! leaving the room does not remove the user's identity from the roster.

use super::model::{UserId, UserPresence};

/// Result of merging a single presence delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Existing entry updated in place
    Updated(UserPresence),
    /// The user is not in the roster; the local roster is stale and a full
    /// snapshot must be requested
    Unknown(UserId),
}

/// Ordered roster of known users
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    users: Vec<UserPresence>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole roster with a server snapshot.
    ///
    /// A snapshot that repeats a `user_id` keeps a single entry at the
    /// position of its first occurrence, holding the last occurrence's values.
    pub fn replace_all(&mut self, snapshot: Vec<UserPresence>) {
        let mut users: Vec<UserPresence> = Vec::with_capacity(snapshot.len());
        for user in snapshot {
            match users.iter_mut().find(|u| u.user_id == user.user_id) {
                Some(existing) => *existing = user,
                None => users.push(user),
            }
        }
        self.users = users;
    }

    /// Merge a single presence delta.
    ///
    /// Only existing entries are updated; an unknown user is never inserted
    /// from a delta.
    pub fn merge_one(&mut self, update: UserPresence) -> MergeOutcome {
        match self.users.iter_mut().find(|u| u.user_id == update.user_id) {
            Some(existing) => {
                existing.is_online = update.is_online;
                existing.username = update.username;
                MergeOutcome::Updated(existing.clone())
            }
            None => MergeOutcome::Unknown(update.user_id),
        }
    }

    pub fn get(&self, user_id: UserId) -> Option<&UserPresence> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    /// All known users in snapshot order
    pub fn users(&self) -> &[UserPresence] {
        &self.users
    }

    pub fn online_count(&self) -> usize {
        self.users.iter().filter(|u| u.is_online).count()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<UserPresence> {
        vec![
            UserPresence::new(1, "alice", true),
            UserPresence::new(2, "bob", false),
            UserPresence::new(3, "charlie", true),
        ]
    }

    #[test]
    fn test_replace_all_keeps_snapshot_order() {
        // テスト項目: スナップショットの順序どおりに名簿が置き換えられる
        // given (前提条件):
        let mut registry = PresenceRegistry::new();
        registry.replace_all(vec![UserPresence::new(9, "zed", true)]);

        // when (操作):
        registry.replace_all(roster());

        // then (期待する結果):
        let ids: Vec<UserId> = registry.users().iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(registry.get(9).is_none());
        assert_eq!(registry.online_count(), 2);
    }

    #[test]
    fn test_replace_all_collapses_duplicate_ids() {
        // テスト項目: 同じ userId が重複した場合、最初の位置に最後の値が残る
        // given (前提条件):
        let mut registry = PresenceRegistry::new();
        let snapshot = vec![
            UserPresence::new(1, "alice", false),
            UserPresence::new(2, "bob", true),
            UserPresence::new(1, "alice", true),
        ];

        // when (操作):
        registry.replace_all(snapshot);

        // then (期待する結果):
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.users()[0], UserPresence::new(1, "alice", true));
    }

    #[test]
    fn test_merge_one_updates_existing_entry_in_place() {
        // テスト項目: 既存ユーザーの状態と表示名がその場で更新される
        // given (前提条件):
        let mut registry = PresenceRegistry::new();
        registry.replace_all(roster());

        // when (操作):
        let outcome = registry.merge_one(UserPresence::new(2, "bobby", true));

        // then (期待する結果):
        assert_eq!(
            outcome,
            MergeOutcome::Updated(UserPresence::new(2, "bobby", true))
        );
        assert_eq!(registry.users()[1], UserPresence::new(2, "bobby", true));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_merge_one_going_offline_keeps_entry() {
        // テスト項目: オフラインになってもエントリは削除されない
        // given (前提条件):
        let mut registry = PresenceRegistry::new();
        registry.replace_all(roster());

        // when (操作):
        registry.merge_one(UserPresence::new(1, "alice", false));

        // then (期待する結果):
        let alice = registry.get(1).expect("alice must stay in the roster");
        assert!(!alice.is_online);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_merge_one_unknown_user_is_not_inserted() {
        // テスト項目: 未知のユーザーの差分は挿入されず、再同期が必要と判定される
        // given (前提条件):
        let mut registry = PresenceRegistry::new();
        registry.replace_all(roster());

        // when (操作):
        let outcome = registry.merge_one(UserPresence::new(42, "dave", true));

        // then (期待する結果):
        assert_eq!(outcome, MergeOutcome::Unknown(42));
        assert!(registry.get(42).is_none());
        assert_eq!(registry.len(), 3);
    }
}
