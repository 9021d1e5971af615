//! Novelty filter: which candidate natural keys a dimension table does not
//! hold yet.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use sqlx::postgres::PgHasArrayType;
use sqlx::{PgPool, Postgres};

use crate::schema::Dimension;
use crate::DbError;

/// A dimension's natural-key type. Channels and videos are keyed by text,
/// categories by integer; the same Rust type is used from the API mapper
/// through to the column so no call site needs a cast.
pub trait NaturalKey:
    Clone
    + Eq
    + Hash
    + Display
    + FromStr
    + Send
    + Sync
    + Unpin
    + 'static
    + sqlx::Type<Postgres>
    + PgHasArrayType
    + for<'q> sqlx::Encode<'q, Postgres>
    + for<'r> sqlx::Decode<'r, Postgres>
{
}

impl NaturalKey for String {}
impl NaturalKey for i32 {}

/// Returns the candidates not present in `existing`, without duplicates, in
/// first-seen order.
#[must_use]
pub fn subtract<K: Eq + Hash + Clone>(candidates: &[K], existing: &HashSet<K>) -> Vec<K> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .filter(|k| !existing.contains(*k) && seen.insert(*k))
        .cloned()
        .collect()
}

/// Returns the keys in `candidates` that `dimension` does not contain.
///
/// Issues one `= ANY($1)` query for the whole candidate set. Duplicates in
/// `candidates` are collapsed; an empty input returns empty without
/// touching the database.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn not_in_table<K: NaturalKey>(
    pool: &PgPool,
    dimension: Dimension,
    candidates: &[K],
) -> Result<Vec<K>, DbError> {
    let unique = subtract(candidates, &HashSet::new());
    if unique.is_empty() {
        return Ok(unique);
    }

    let sql = format!(
        "SELECT {col} FROM {table} WHERE {col} = ANY($1)",
        col = dimension.key_column(),
        table = dimension.table(),
    );
    let existing: HashSet<K> = sqlx::query_scalar::<_, K>(&sql)
        .bind(unique.clone())
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect();

    tracing::debug!(
        table = dimension.table(),
        candidates = unique.len(),
        existing = existing.len(),
        "novelty filter"
    );

    Ok(subtract(&unique, &existing))
}

/// Returns every natural key in `dimension`, ordered by key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn all_keys<K: NaturalKey>(
    pool: &PgPool,
    dimension: Dimension,
) -> Result<Vec<K>, DbError> {
    let sql = format!(
        "SELECT {col} FROM {table} ORDER BY {col}",
        col = dimension.key_column(),
        table = dimension.table(),
    );
    let keys = sqlx::query_scalar::<_, K>(&sql).fetch_all(pool).await?;
    Ok(keys)
}
