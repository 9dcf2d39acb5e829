//! Builds condenser_api-compatible account and post objects from cache rows.
//!
//! Field names, order and formatting are the legacy wire contract: renaming or
//! dropping a field breaks old clients.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::CondenserError;
use crate::legacy::source::RowSource;
use crate::legacy::votes::{hydrate_active_votes, Vote};
use crate::models::account::AccountRow;
use crate::models::post::PostCacheRow;
use crate::normalize::amount::{legacy_amount, Amount};
use crate::normalize::reputation::display_to_raw;
use crate::normalize::text::json_date;

/// Anything this short cannot be a serialized post object.
const MIN_RAW_JSON_LEN: usize = 33;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyAccount {
    pub name: String,
    pub reputation: i64,
    pub net_vesting_shares: f64,
    /// JSON-encoded `{"profile": {"name", "about"}}`.
    pub json_metadata: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPost {
    pub post_id: i32,
    pub author: String,
    pub permlink: String,
    pub category: String,
    pub parent_permlink: String,
    pub parent_author: String,
    pub title: String,
    pub body: String,
    pub json_metadata: String,
    pub created: String,
    pub depth: i16,
    pub children: i32,
    pub net_rshares: i64,
    pub last_payout: String,
    pub cashout_time: String,
    pub total_payout_value: String,
    pub curator_payout_value: String,
    pub pending_payout_value: String,
    pub promoted: String,
    pub replies: Vec<Value>,
    pub body_length: usize,
    pub active_votes: Vec<Vote>,
    pub author_reputation: i64,
    pub root_title: String,
    pub max_accepted_payout: String,
    pub percent_steem_dollars: u16,
    pub url: String,
}

/// Fields recovered from the chain's own post object (`raw_json`).
#[derive(Debug, Deserialize)]
struct RawPostJson {
    parent_author: Option<String>,
    parent_permlink: Option<String>,
    root_title: String,
    max_accepted_payout: Value,
    percent_steem_dollars: u16,
    url: String,
}

#[derive(Serialize)]
struct ProfileMetadata<'a> {
    profile: Profile<'a>,
}

#[derive(Serialize)]
struct Profile<'a> {
    name: Option<&'a str>,
    about: Option<&'a str>,
}

/// `get_accounts`-style lookup. Output follows row order, not `names` order.
pub async fn build_accounts(
    source: &dyn RowSource,
    names: &[String],
) -> Result<Vec<LegacyAccount>, CondenserError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let rows = source.fetch_accounts(names).await?;
    debug!("Loaded {} of {} requested accounts", rows.len(), names.len());
    rows.iter().map(condenser_account_object).collect()
}

/// Returns full post objects in the same order as `ids`.
///
/// Ids missing from the cache are logged, described via the fallback lookup
/// and dropped, so the result may be shorter than `ids`. A present row with a
/// corrupt `raw_json` fails the whole call.
pub async fn build_posts(
    source: &dyn RowSource,
    ids: &[i32],
    truncate_body: usize,
) -> Result<Vec<LegacyPost>, CondenserError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut posts_by_id = HashMap::with_capacity(ids.len());
    for row in source.fetch_posts_by_id(ids).await? {
        let post = condenser_post_object(&row, truncate_body)?;
        posts_by_id.insert(row.post_id, post);
    }

    let missed: BTreeSet<i32> = ids
        .iter()
        .copied()
        .filter(|id| !posts_by_id.contains_key(id))
        .collect();
    if !missed.is_empty() {
        report_cache_misses(source, &missed).await;
    }

    Ok(ids
        .iter()
        .filter_map(|id| posts_by_id.get(id).cloned())
        .collect())
}

/// Cache inconsistency is rare and non-fatal: describe each miss from the
/// authoritative table so it can be repaired.
async fn report_cache_misses(source: &dyn RowSource, missed: &BTreeSet<i32>) {
    warn!("get_posts ids do not exist in cache: {missed:?}");
    for &id in missed {
        match source.fetch_post_fallback(id).await {
            Ok(Some(row)) => warn!("missing: {row:?}"),
            Ok(None) => warn!("missing: post {id} is absent from hive_posts as well"),
            Err(e) => warn!("missing: post {id}, fallback lookup failed: {e}"),
        }
    }
}

/// Converts an internal account record into legacy-steemd style.
pub fn condenser_account_object(row: &AccountRow) -> Result<LegacyAccount, CondenserError> {
    let metadata = ProfileMetadata {
        profile: Profile {
            name: row.display_name.as_deref(),
            about: row.about.as_deref(),
        },
    };
    let json_metadata = serde_json::to_string(&metadata).map_err(anyhow::Error::from)?;

    Ok(LegacyAccount {
        name: row.name.clone(),
        reputation: row.reputation.map(display_to_raw).unwrap_or(0),
        net_vesting_shares: row.vote_weight,
        json_metadata,
    })
}

/// Given a cache row, creates a legacy-style post object.
pub fn condenser_post_object(
    row: &PostCacheRow,
    truncate_body: usize,
) -> Result<LegacyPost, CondenserError> {
    let raw = parse_raw_json(row)?;
    let paid = row.is_paidout;
    let zero_sbd = Amount::sbd(Decimal::ZERO).to_legacy();
    let payout_sbd = Amount::sbd(row.payout).to_legacy();

    let (parent_author, parent_permlink) = if row.depth > 0 {
        (
            raw.parent_author
                .ok_or_else(|| corrupt(row, "raw_json has no parent_author"))?,
            raw.parent_permlink
                .ok_or_else(|| corrupt(row, "raw_json has no parent_permlink"))?,
        )
    } else {
        (String::new(), String::new())
    };

    let body = if truncate_body > 0 {
        row.body.chars().take(truncate_body).collect()
    } else {
        row.body.clone()
    };

    Ok(LegacyPost {
        post_id: row.post_id,
        author: row.author.clone(),
        permlink: row.permlink.clone(),
        category: row.category.clone(),
        parent_permlink,
        parent_author,
        title: row.title.clone(),
        body,
        json_metadata: row.json.clone().unwrap_or_default(),
        created: json_date(Some(row.created_at)),
        depth: row.depth,
        children: row.children,
        net_rshares: row.rshares,
        last_payout: json_date(paid.then_some(row.payout_at)),
        cashout_time: json_date((!paid).then_some(row.payout_at)),
        total_payout_value: if paid { payout_sbd.clone() } else { zero_sbd.clone() },
        curator_payout_value: zero_sbd.clone(),
        pending_payout_value: if paid { zero_sbd } else { payout_sbd },
        promoted: Amount::sbd(row.promoted).to_legacy(),
        replies: Vec::new(),
        body_length: row.body.chars().count(),
        active_votes: hydrate_active_votes(row.votes.as_deref()),
        author_reputation: row.author_rep.map(display_to_raw).unwrap_or(0),
        root_title: raw.root_title,
        max_accepted_payout: legacy_amount(&raw.max_accepted_payout)?,
        percent_steem_dollars: raw.percent_steem_dollars,
        url: raw.url,
    })
}

fn parse_raw_json(row: &PostCacheRow) -> Result<RawPostJson, CondenserError> {
    let raw = row
        .raw_json
        .as_deref()
        .ok_or_else(|| corrupt(row, "raw_json is missing"))?;
    if raw.chars().count() < MIN_RAW_JSON_LEN {
        return Err(corrupt(row, &format!("raw_json too short: {raw:?}")));
    }
    serde_json::from_str(raw).map_err(|e| corrupt(row, &format!("raw_json unreadable: {e}")))
}

fn corrupt(row: &PostCacheRow, reason: &str) -> CondenserError {
    CondenserError::CorruptPost {
        post_id: row.post_id,
        reason: reason.to_string(),
    }
}
