use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Flattened `hive_posts_cache` row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostCacheRow {
    pub post_id: i32,
    pub author: String,
    pub permlink: String,
    pub title: String,
    pub body: String,
    pub promoted: Decimal,
    pub payout: Decimal,
    pub created_at: NaiveDateTime,
    pub payout_at: NaiveDateTime,
    pub is_paidout: bool,
    pub rshares: i64,
    /// Full legacy post object as last seen on chain.
    pub raw_json: Option<String>,
    pub category: String,
    pub depth: i16,
    pub json: Option<String>,
    pub children: i32,
    /// Newline-separated `voter,rshares,percent,reputation` lines.
    pub votes: Option<String>,
    pub author_rep: Option<f64>,
}

/// Source-of-truth `hive_posts` row, only read to describe cache misses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostRow {
    pub id: i32,
    pub author: String,
    pub permlink: String,
    pub depth: i16,
    pub created_at: NaiveDateTime,
    pub is_deleted: bool,
}
