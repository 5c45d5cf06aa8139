//! Per-server channel slots.

use super::Store;
use tolk_core::{config::MAX_CHANNEL_SLOTS, error::TolkError};

type ChannelRow = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// The channels enrolled for translation on one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerChannels {
    pub server_id: String,
    /// Always `MAX_CHANNEL_SLOTS` long; `None` marks an unset slot.
    pub slots: Vec<Option<String>>,
}

impl ServerChannels {
    /// A server with every slot unset.
    pub fn empty(server_id: &str) -> Self {
        Self {
            server_id: server_id.to_string(),
            slots: vec![None; MAX_CHANNEL_SLOTS],
        }
    }

    fn from_row(row: ChannelRow) -> Self {
        let (server_id, c1, c2, c3, c4, c5) = row;
        Self {
            server_id,
            slots: vec![c1, c2, c3, c4, c5],
        }
    }

    /// Overwrite the slots given in `overrides`; `None` entries keep the
    /// current value.
    pub fn apply(&mut self, overrides: &[Option<String>]) {
        for (slot, value) in self.slots.iter_mut().zip(overrides) {
            if let Some(channel_id) = value {
                *slot = Some(channel_id.clone());
            }
        }
    }
}

impl Store {
    /// Every server's channel record.
    pub async fn load_server_channels(&self) -> Result<Vec<ServerChannels>, TolkError> {
        let rows: Vec<ChannelRow> = sqlx::query_as(
            "SELECT server_id, channel_id1, channel_id2, channel_id3, channel_id4, channel_id5 \
             FROM channels ORDER BY server_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TolkError::Store(format!("query failed: {e}")))?;

        Ok(rows.into_iter().map(ServerChannels::from_row).collect())
    }

    /// One server's channel record, if it has one.
    pub async fn get_server_channels(
        &self,
        server_id: &str,
    ) -> Result<Option<ServerChannels>, TolkError> {
        let row: Option<ChannelRow> = sqlx::query_as(
            "SELECT server_id, channel_id1, channel_id2, channel_id3, channel_id4, channel_id5 \
             FROM channels WHERE server_id = ?",
        )
        .bind(server_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TolkError::Store(format!("query failed: {e}")))?;

        Ok(row.map(ServerChannels::from_row))
    }

    /// Slot-wise upsert: only `Some` entries of `overrides` replace the stored
    /// value, everything else is preserved. Returns the record as written.
    ///
    /// The read and the write share one transaction.
    pub async fn upsert_server_channels(
        &self,
        server_id: &str,
        overrides: &[Option<String>],
    ) -> Result<ServerChannels, TolkError> {
        if overrides.len() > MAX_CHANNEL_SLOTS {
            return Err(TolkError::Validation(format!(
                "at most {MAX_CHANNEL_SLOTS} channel slots are supported"
            )));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TolkError::Store(format!("failed to begin transaction: {e}")))?;

        let existing: Option<ChannelRow> = sqlx::query_as(
            "SELECT server_id, channel_id1, channel_id2, channel_id3, channel_id4, channel_id5 \
             FROM channels WHERE server_id = ?",
        )
        .bind(server_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| TolkError::Store(format!("query failed: {e}")))?;

        let mut record = existing
            .map(ServerChannels::from_row)
            .unwrap_or_else(|| ServerChannels::empty(server_id));
        record.apply(overrides);

        sqlx::query(
            "INSERT INTO channels \
             (server_id, channel_id1, channel_id2, channel_id3, channel_id4, channel_id5) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(server_id) DO UPDATE SET \
             channel_id1 = excluded.channel_id1, \
             channel_id2 = excluded.channel_id2, \
             channel_id3 = excluded.channel_id3, \
             channel_id4 = excluded.channel_id4, \
             channel_id5 = excluded.channel_id5, \
             updated_at = datetime('now')",
        )
        .bind(server_id)
        .bind(&record.slots[0])
        .bind(&record.slots[1])
        .bind(&record.slots[2])
        .bind(&record.slots[3])
        .bind(&record.slots[4])
        .execute(&mut *tx)
        .await
        .map_err(|e| TolkError::Store(format!("upsert failed: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| TolkError::Store(format!("commit failed: {e}")))?;

        Ok(record)
    }
}
