//! The storage seam the ETL jobs are written against.

use std::future::Future;

use sqlx::PgPool;

use crate::novelty::{self, NaturalKey};
use crate::schema::Dimension;
use crate::sink::{self, SinkRow};
use crate::DbError;

/// Novelty filter, key listing and row sink over one warehouse.
///
/// Implemented for [`PgPool`]; tests substitute an in-memory store.
pub trait Warehouse {
    /// Candidate keys `dimension` does not hold yet, de-duplicated.
    fn not_in_table<K: NaturalKey>(
        &self,
        dimension: Dimension,
        candidates: &[K],
    ) -> impl Future<Output = Result<Vec<K>, DbError>>;

    /// Every key currently in `dimension`.
    fn all_keys<K: NaturalKey>(
        &self,
        dimension: Dimension,
    ) -> impl Future<Output = Result<Vec<K>, DbError>>;

    /// All-or-nothing insert of `rows` into `R::TABLE`.
    fn insert_rows<R: SinkRow>(&self, rows: &[R]) -> impl Future<Output = Result<u64, DbError>>;
}

impl Warehouse for PgPool {
    async fn not_in_table<K: NaturalKey>(
        &self,
        dimension: Dimension,
        candidates: &[K],
    ) -> Result<Vec<K>, DbError> {
        novelty::not_in_table(self, dimension, candidates).await
    }

    async fn all_keys<K: NaturalKey>(&self, dimension: Dimension) -> Result<Vec<K>, DbError> {
        novelty::all_keys(self, dimension).await
    }

    async fn insert_rows<R: SinkRow>(&self, rows: &[R]) -> Result<u64, DbError> {
        sink::insert_rows(self, rows).await
    }
}
