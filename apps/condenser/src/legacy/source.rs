//! Row source — the storage collaborator the object builder reads from.
//!
//! Production: `PgRowSource` over the hive Postgres schema.
//! Tests swap in an in-memory implementation; the builder only sees the trait.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::CondenserError;
use crate::models::account::AccountRow;
use crate::models::post::{PostCacheRow, PostRow};

/// Read-only access to account and post rows. Implementations own any
/// timeout or retry policy; the builder calls each method at most once per
/// requested item.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Rows for the named accounts, in no particular order.
    async fn fetch_accounts(&self, names: &[String]) -> Result<Vec<AccountRow>, CondenserError>;

    /// Cache rows for the given post ids, in no particular order.
    async fn fetch_posts_by_id(&self, ids: &[i32]) -> Result<Vec<PostCacheRow>, CondenserError>;

    /// Authoritative post row, used only to describe a cache miss.
    async fn fetch_post_fallback(&self, id: i32) -> Result<Option<PostRow>, CondenserError>;
}

#[derive(Clone)]
pub struct PgRowSource {
    pool: PgPool,
}

impl PgRowSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RowSource for PgRowSource {
    async fn fetch_accounts(&self, names: &[String]) -> Result<Vec<AccountRow>, CondenserError> {
        Ok(sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, name, display_name, about,
                   reputation::float8 AS reputation, vote_weight::float8 AS vote_weight
            FROM hive_accounts
            WHERE name = ANY($1)
            "#,
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn fetch_posts_by_id(&self, ids: &[i32]) -> Result<Vec<PostCacheRow>, CondenserError> {
        Ok(sqlx::query_as::<_, PostCacheRow>(
            r#"
            SELECT post_id, author, permlink, title, body, promoted, payout,
                   created_at, payout_at, is_paidout, rshares, raw_json,
                   category, depth, json, children::int4 AS children, votes,
                   author_rep::float8 AS author_rep
            FROM hive_posts_cache
            WHERE post_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn fetch_post_fallback(&self, id: i32) -> Result<Option<PostRow>, CondenserError> {
        Ok(sqlx::query_as::<_, PostRow>(
            "SELECT id, author, permlink, depth, created_at, is_deleted FROM hive_posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
