//! Banned word list.

use super::Store;
use tolk_core::{error::TolkError, filters::normalize_word};

impl Store {
    /// Insert words, skipping blanks and words already banned.
    ///
    /// Returns only the words that were actually added, in input order.
    pub async fn add_words(&self, words: &[String]) -> Result<Vec<String>, TolkError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TolkError::Store(format!("failed to begin transaction: {e}")))?;

        let mut added = Vec::new();
        for word in words.iter().filter_map(|w| normalize_word(w)) {
            let result = sqlx::query("INSERT OR IGNORE INTO wordban (word) VALUES (?)")
                .bind(&word)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    TolkError::Store(format!("failed to add word '{word}' to ban list: {e}"))
                })?;
            if result.rows_affected() > 0 {
                added.push(word);
            }
        }

        tx.commit()
            .await
            .map_err(|e| TolkError::Store(format!("commit failed: {e}")))?;

        Ok(added)
    }

    /// Delete a word. Returns whether it was present.
    pub async fn remove_word(&self, word: &str) -> Result<bool, TolkError> {
        let Some(word) = normalize_word(word) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM wordban WHERE word = ?")
            .bind(&word)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                TolkError::Store(format!("failed to remove word '{word}' from ban list: {e}"))
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// All banned words, sorted.
    pub async fn list_words(&self) -> Result<Vec<String>, TolkError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT word FROM wordban ORDER BY word")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TolkError::Store(format!("failed to retrieve banned words: {e}")))?;
        Ok(rows.into_iter().map(|(w,)| w).collect())
    }
}
