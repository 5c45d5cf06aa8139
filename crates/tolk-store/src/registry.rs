//! In-memory view of the store: the channel enrollment index and the banned
//! word set.
//!
//! Readers take an `Arc<Snapshot>` and never wait on the database. Writers
//! are serialized, write through to the [`Store`], reload everything and
//! swap the snapshot before returning, so a caller that saw a mutation
//! succeed is guaranteed that every later read observes it.

use crate::store::{ServerChannels, Store};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tolk_core::{error::TolkError, filters::normalize_word};
use tracing::{debug, info};

/// Immutable copy of everything the pipeline needs per message.
#[derive(Debug, Default)]
pub struct Snapshot {
    /// server_id → configured slots (truncated to the active slot count).
    servers: HashMap<String, Vec<Option<String>>>,
    /// Every channel ID set in any slot of any server.
    enrolled: HashSet<String>,
    banned: BTreeSet<String>,
}

impl Snapshot {
    fn build(records: Vec<ServerChannels>, words: Vec<String>, slots: usize) -> Self {
        let mut servers = HashMap::with_capacity(records.len());
        let mut enrolled = HashSet::new();
        for record in records {
            let active: Vec<Option<String>> = record.slots.into_iter().take(slots).collect();
            enrolled.extend(active.iter().flatten().filter(|c| !c.is_empty()).cloned());
            servers.insert(record.server_id, active);
        }
        Self {
            servers,
            enrolled,
            banned: words.into_iter().collect(),
        }
    }

    /// Whether any server has `channel_id` in one of its slots.
    pub fn is_enrolled(&self, channel_id: &str) -> bool {
        self.enrolled.contains(channel_id)
    }

    pub fn banned_words(&self) -> &BTreeSet<String> {
        &self.banned
    }

    /// The server's slots, if it has a record.
    pub fn channels_for(&self, server_id: &str) -> Option<&[Option<String>]> {
        self.servers.get(server_id).map(Vec::as_slice)
    }

    pub fn enrolled_count(&self) -> usize {
        self.enrolled.len()
    }
}

/// Shared, explicitly-owned translation state.
pub struct Registry {
    store: Store,
    slots: usize,
    snapshot: RwLock<Arc<Snapshot>>,
    /// Serializes mutations end-to-end (write, reload, swap).
    write_lock: Mutex<()>,
}

impl Registry {
    /// Load the initial snapshot. Fails if the store cannot be read.
    pub async fn load(store: Store, slots: usize) -> Result<Self, TolkError> {
        let snapshot = Self::read_snapshot(&store, slots).await?;
        info!(
            "registry loaded: {} servers, {} enrolled channels, {} banned words",
            snapshot.servers.len(),
            snapshot.enrolled.len(),
            snapshot.banned.len()
        );
        Ok(Self {
            store,
            slots,
            snapshot: RwLock::new(Arc::new(snapshot)),
            write_lock: Mutex::new(()),
        })
    }

    async fn read_snapshot(store: &Store, slots: usize) -> Result<Snapshot, TolkError> {
        let records = store.load_server_channels().await?;
        let words = store.list_words().await?;
        Ok(Snapshot::build(records, words, slots))
    }

    /// Number of channel slots per server.
    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Global enrollment check across all servers.
    pub fn is_enrolled(&self, channel_id: &str) -> bool {
        self.snapshot().is_enrolled(channel_id)
    }

    /// The server's slots, all `None` when it has no record yet.
    pub fn channels_for(&self, server_id: &str) -> Vec<Option<String>> {
        self.snapshot()
            .channels_for(server_id)
            .map(<[Option<String>]>::to_vec)
            .unwrap_or_else(|| vec![None; self.slots])
    }

    /// Rebuild the snapshot from the store.
    ///
    /// Callers must hold `write_lock`.
    async fn reload_locked(&self) -> Result<(), TolkError> {
        let fresh = Arc::new(Self::read_snapshot(&self.store, self.slots).await?);
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = fresh;
        debug!("registry snapshot swapped");
        Ok(())
    }

    /// Enroll channels for `server_id`, slot by slot.
    ///
    /// `overrides[i]` targets slot `i + 1`; `None` keeps the current value.
    /// Returns the server's slots after the write.
    pub async fn set_channels(
        &self,
        server_id: &str,
        overrides: &[Option<String>],
    ) -> Result<Vec<Option<String>>, TolkError> {
        let overrides: Vec<Option<String>> = overrides
            .iter()
            .map(|o| {
                o.as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
            })
            .collect();

        if overrides.iter().all(Option::is_none) {
            return Err(TolkError::Validation(
                "At least one channel must be provided.".into(),
            ));
        }
        if let Some(extra) = overrides.iter().skip(self.slots).position(Option::is_some) {
            return Err(TolkError::Validation(format!(
                "channel {} is out of range: this bot supports {} channels per server",
                self.slots + extra + 1,
                self.slots
            )));
        }

        let _guard = self.write_lock.lock().await;
        let record = self
            .store
            .upsert_server_channels(server_id, &overrides)
            .await?;
        self.reload_locked().await?;
        info!("channels updated for server {server_id}");

        Ok(record.slots.into_iter().take(self.slots).collect())
    }

    /// Ban words. Returns the words that were newly added.
    ///
    /// The snapshot is rebuilt even when nothing was added, so a retry after
    /// a failed reload brings it back in line with the store.
    pub async fn add_words(&self, words: &[String]) -> Result<Vec<String>, TolkError> {
        let _guard = self.write_lock.lock().await;
        let added = self.store.add_words(words).await?;
        self.reload_locked().await?;
        if !added.is_empty() {
            info!("banned {} new word(s)", added.len());
        }
        Ok(added)
    }

    /// Unban a word. Returns whether it was banned before.
    pub async fn remove_word(&self, word: &str) -> Result<bool, TolkError> {
        if normalize_word(word).is_none() {
            return Err(TolkError::Validation("No word provided to remove.".into()));
        }
        let _guard = self.write_lock.lock().await;
        let removed = self.store.remove_word(word).await?;
        self.reload_locked().await?;
        Ok(removed)
    }

    /// Banned words as stored, sorted.
    pub async fn list_words(&self) -> Result<Vec<String>, TolkError> {
        self.store.list_words().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_registry(slots: usize) -> Registry {
        let store = Store::in_memory().await.unwrap();
        Registry::load(store, slots).await.unwrap()
    }

    fn ch(id: &str) -> Option<String> {
        Some(id.to_string())
    }

    #[tokio::test]
    async fn test_enrollment_round_trip() {
        let reg = test_registry(3).await;
        reg.set_channels("s1", &[ch("c1")]).await.unwrap();
        let slots = reg.set_channels("s1", &[None, ch("c2")]).await.unwrap();

        assert_eq!(slots, vec![ch("c1"), ch("c2"), None]);
        assert!(reg.is_enrolled("c1"));
        assert!(reg.is_enrolled("c2"));
        assert!(!reg.is_enrolled("c3"));
    }

    #[tokio::test]
    async fn test_enrollment_is_global_across_servers() {
        let reg = test_registry(3).await;
        reg.set_channels("s1", &[ch("c1")]).await.unwrap();
        // Lookup has no server scope: c1 is enrolled no matter who asks.
        assert!(reg.is_enrolled("c1"));
        assert_eq!(reg.channels_for("s2"), vec![None, None, None]);
    }

    #[tokio::test]
    async fn test_unset_slots_never_match() {
        let reg = test_registry(3).await;
        reg.set_channels("s1", &[ch("c1")]).await.unwrap();
        assert!(!reg.is_enrolled(""));
        assert_eq!(reg.snapshot().enrolled_count(), 1);
    }

    #[tokio::test]
    async fn test_set_channels_requires_one_channel() {
        let reg = test_registry(3).await;
        let err = reg.set_channels("s1", &[None, None]).await.unwrap_err();
        assert!(matches!(err, TolkError::Validation(_)));
        let err = reg.set_channels("s1", &[ch("  ")]).await.unwrap_err();
        assert!(matches!(err, TolkError::Validation(_)));
        assert!(reg.store().get_server_channels("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_channels_rejects_slot_beyond_limit() {
        let reg = test_registry(2).await;
        let err = reg
            .set_channels("s1", &[ch("a"), None, ch("c")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("channel 3 is out of range"));
        // Trailing `None`s past the limit are fine.
        reg.set_channels("s1", &[ch("a"), None, None]).await.unwrap();
    }

    #[tokio::test]
    async fn test_slots_beyond_active_count_are_ignored() {
        let store = Store::in_memory().await.unwrap();
        store
            .upsert_server_channels("s1", &[ch("a"), None, None, ch("d")])
            .await
            .unwrap();
        let reg = Registry::load(store, 3).await.unwrap();
        assert!(reg.is_enrolled("a"));
        assert!(!reg.is_enrolled("d"));
    }

    #[tokio::test]
    async fn test_word_mutations_refresh_snapshot() {
        let reg = test_registry(3).await;
        let added = reg
            .add_words(&["Spam".into(), "eggs".into()])
            .await
            .unwrap();
        assert_eq!(added, vec!["spam".to_string(), "eggs".to_string()]);
        assert!(reg.snapshot().banned_words().contains("spam"));

        assert!(reg.remove_word("SPAM").await.unwrap());
        assert!(!reg.snapshot().banned_words().contains("spam"));
        assert!(!reg.remove_word("spam").await.unwrap());
        assert!(matches!(
            reg.remove_word("  ").await,
            Err(TolkError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_repeated_add_resyncs_stale_snapshot() {
        let reg = test_registry(3).await;
        // The word is committed but the snapshot never saw it, as after a
        // write whose reload failed.
        reg.store().add_words(&["spam".into()]).await.unwrap();
        assert!(!reg.snapshot().banned_words().contains("spam"));

        let added = reg.add_words(&["spam".into()]).await.unwrap();
        assert!(added.is_empty());
        assert!(reg.snapshot().banned_words().contains("spam"));
    }

    #[tokio::test]
    async fn test_repeated_remove_resyncs_stale_snapshot() {
        let reg = test_registry(3).await;
        reg.add_words(&["spam".into()]).await.unwrap();
        reg.store().remove_word("spam").await.unwrap();
        assert!(reg.snapshot().banned_words().contains("spam"));

        assert!(!reg.remove_word("spam").await.unwrap());
        assert!(!reg.snapshot().banned_words().contains("spam"));
    }

    #[tokio::test]
    async fn test_old_snapshot_stays_valid_after_swap() {
        let reg = test_registry(3).await;
        let before = reg.snapshot();
        reg.add_words(&["late".into()]).await.unwrap();
        assert!(!before.banned_words().contains("late"));
        assert!(reg.snapshot().banned_words().contains("late"));
    }

    #[tokio::test]
    async fn test_concurrent_add_and_list_never_lose_confirmed_words() {
        let reg = Arc::new(test_registry(3).await);

        let mut handles = Vec::new();
        for i in 0..16 {
            let reg = reg.clone();
            handles.push(tokio::spawn(async move {
                let word = format!("word{i}");
                let added = reg.add_words(&[word.clone()]).await.unwrap();
                assert_eq!(added, vec![word.clone()]);
                // Once the add is confirmed, every later read must see it.
                assert!(reg.snapshot().banned_words().contains(&word));
                assert!(reg.list_words().await.unwrap().contains(&word));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(reg.list_words().await.unwrap().len(), 16);
        assert_eq!(reg.snapshot().banned_words().len(), 16);
    }
}
