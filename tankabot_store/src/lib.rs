//! Postgres-backed candidate store: harvested news items and the tanka
//! found inside them, one row per bot per item.

use chrono::{DateTime, Utc};
use snafu::{ResultExt, Snafu};
use sqlx::PgPool;
use tracing::instrument;

type Result<T, E = Error> = std::result::Result<T, E>;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    BotLookupFailed { source: sqlx::Error },
    BotRegistrationFailed { source: sqlx::Error },
    CandidateInsertFailed { source: sqlx::Error },
    CandidatePruneFailed { source: sqlx::Error },
    CandidatePickFailed { source: sqlx::Error },
    CandidateDeleteFailed { source: sqlx::Error },
}

#[derive(Debug, Clone)]
pub struct HarvestedItem {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// An item whose body yielded at least one tanka, ready to stock.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub item_id: i32,
    pub tankas: String,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub item_id: i32,
    pub title: String,
    pub url: String,
    pub tankas: String,
}

#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self), err)]
    pub async fn bot_id(&self, name: &str) -> Result<i32> {
        sqlx::query_scalar!("SELECT id FROM bots WHERE name = $1", name)
            .fetch_one(&self.pool)
            .await
            .context(BotLookupFailedError)
    }

    /// Register `name` as a bot if it isn't already known.
    #[instrument(skip(self), err)]
    pub async fn add_new_bot(&self, name: &str) -> Result<()> {
        sqlx::query!(
            "INSERT INTO bots (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
            name
        )
        .execute(&self.pool)
        .await
        .context(BotRegistrationFailedError)?;
        Ok(())
    }

    /// Record every harvested item that yielded at least one tanka,
    /// deduped by item id.
    #[instrument(skip(self, new_items), fields(n = new_items.len()), err)]
    pub async fn stock_candidates(&self, bot_id: i32, new_items: &[NewCandidate]) -> Result<()> {
        for item in new_items {
            sqlx::query!(
                r#"INSERT INTO tanka_candidates (bot_id, item_id, tankas)
                   VALUES ($1, $2, $3)
                   ON CONFLICT (bot_id, item_id) DO NOTHING"#,
                bot_id,
                item.item_id,
                item.tankas,
            )
            .execute(&self.pool)
            .await
            .context(CandidateInsertFailedError)?;
        }
        Ok(())
    }

    /// Keep only the `keep_n` most recently updated candidates for `bot_id`.
    #[instrument(skip(self), err)]
    pub async fn prune_oldest(&self, bot_id: i32, keep_n: i64) -> Result<()> {
        sqlx::query!(
            r#"DELETE FROM tanka_candidates
               WHERE bot_id = $1 AND id NOT IN (
                   SELECT id FROM tanka_candidates
                   WHERE bot_id = $1
                   ORDER BY updated_at DESC
                   LIMIT $2
               )"#,
            bot_id,
            keep_n,
        )
        .execute(&self.pool)
        .await
        .context(CandidatePruneFailedError)?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn pick_random(&self, bot_id: i32) -> Result<Option<Candidate>> {
        sqlx::query_as!(
            Candidate,
            r#"SELECT
                   tanka_candidates.item_id,
                   tanka_candidates.tankas,
                   harvested_items.title,
                   harvested_items.url
               FROM tanka_candidates
               INNER JOIN harvested_items ON harvested_items.id = tanka_candidates.item_id
               WHERE tanka_candidates.bot_id = $1
               ORDER BY random()
               LIMIT 1"#,
            bot_id,
        )
        .fetch_optional(&self.pool)
        .await
        .context(CandidatePickFailedError)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_candidate(&self, bot_id: i32, item_id: i32) -> Result<()> {
        sqlx::query!(
            "DELETE FROM tanka_candidates WHERE bot_id = $1 AND item_id = $2",
            bot_id,
            item_id,
        )
        .execute(&self.pool)
        .await
        .context(CandidateDeleteFailedError)?;
        Ok(())
    }
}
