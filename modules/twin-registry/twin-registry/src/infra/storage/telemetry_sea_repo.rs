//! SeaORM implementation of [`TelemetryRepository`].
//!
//! Readings are keyed by `(twin_id, name, ts)` with the surrogate `seq`
//! breaking timestamp ties in insertion order.
//!
//! Reads page through the ordered rows so that a skipped malformed row never
//! shortens a limited result or hides an older valid reading.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect,
    Select, Set,
};
use twin_registry_sdk::{SortOrder, TelemetryRangeQuery, TelemetryRecord};

use super::db::{db_err, query_rows};
use super::entity::telemetry::{ActiveModel, Column, Entity as TelemetryEntity, Model};
use super::mapper::{decode_raw_rows, unix_micros_ceil, unix_micros_floor, value_columns};
use crate::domain::error::DomainError;
use crate::domain::repos::TelemetryRepository;

pub struct SeaOrmTelemetryRepository {
    db: DatabaseConnection,
}

/// Rows fetched per page while scanning for the newest valid reading.
const LATEST_PAGE: u64 = 16;

impl SeaOrmTelemetryRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch one page of `select` and decode it, skipping malformed rows.
    ///
    /// Returns the decoded records and whether the page came back full.
    async fn page(
        &self,
        select: &Select<TelemetryEntity>,
        offset: u64,
        size: u64,
    ) -> Result<(Vec<TelemetryRecord>, bool), DomainError> {
        let paged = select.clone().offset(offset).limit(size);
        let rows = query_rows(&self.db, &paged).await?;
        let full = u64::try_from(rows.len()).is_ok_and(|n| n >= size);
        Ok((decode_raw_rows::<Model, _>(&rows, "telemetry", "seq"), full))
    }
}

/// Row cap for a range query, `None` meaning unbounded.
///
/// Limits the database cannot bind as a signed 64-bit value are treated as
/// unbounded.
fn row_cap(limit: u64) -> Option<u64> {
    (limit > 0 && i64::try_from(limit).is_ok()).then_some(limit)
}

fn to_active(record: &TelemetryRecord) -> Result<ActiveModel, DomainError> {
    let (numeric, text, boolean) = value_columns(&record.value);
    Ok(ActiveModel {
        seq: NotSet,
        twin_id: Set(record.twin_id.clone()),
        name: Set(record.name.clone()),
        ts: Set(unix_micros_floor(record.timestamp)?),
        value_numeric: Set(numeric),
        value_text: Set(text),
        value_boolean: Set(boolean),
    })
}

#[async_trait]
impl TelemetryRepository for SeaOrmTelemetryRepository {
    async fn append(&self, record: &TelemetryRecord) -> Result<(), DomainError> {
        let m = to_active(record)?;
        TelemetryEntity::insert(m)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn append_many(&self, records: &[TelemetryRecord]) -> Result<u64, DomainError> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows = records
            .iter()
            .map(to_active)
            .collect::<Result<Vec<_>, _>>()?;
        TelemetryEntity::insert_many(rows)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)
    }

    async fn range(
        &self,
        query: &TelemetryRangeQuery,
    ) -> Result<Vec<TelemetryRecord>, DomainError> {
        let start = unix_micros_ceil(query.start)?;
        let end = unix_micros_floor(query.end)?;

        let mut select = TelemetryEntity::find()
            .filter(Column::TwinId.eq(query.twin_id.as_str()))
            .filter(Column::Name.eq(query.name.as_str()))
            .filter(Column::Ts.between(start, end));
        select = match query.order {
            SortOrder::Ascending => select.order_by_asc(Column::Ts).order_by_asc(Column::Seq),
            SortOrder::Descending => select.order_by_desc(Column::Ts).order_by_desc(Column::Seq),
        };

        let Some(cap) = row_cap(query.limit) else {
            let rows = query_rows(&self.db, &select).await?;
            return Ok(decode_raw_rows::<Model, _>(&rows, "telemetry", "seq"));
        };

        let mut records = Vec::new();
        let mut offset = 0;
        loop {
            let wanted = cap.saturating_sub(u64::try_from(records.len()).unwrap_or(cap));
            let (mut page, full) = self.page(&select, offset, wanted).await?;
            records.append(&mut page);
            if !full || u64::try_from(records.len()).is_ok_and(|n| n >= cap) {
                return Ok(records);
            }
            offset = offset.saturating_add(wanted);
        }
    }

    async fn names(&self, twin_id: &str) -> Result<Vec<String>, DomainError> {
        TelemetryEntity::find()
            .select_only()
            .column(Column::Name)
            .distinct()
            .filter(Column::TwinId.eq(twin_id))
            .order_by_asc(Column::Name)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn latest(
        &self,
        twin_id: &str,
        name: &str,
    ) -> Result<Option<TelemetryRecord>, DomainError> {
        let select = TelemetryEntity::find()
            .filter(Column::TwinId.eq(twin_id))
            .filter(Column::Name.eq(name))
            .order_by_desc(Column::Ts)
            .order_by_desc(Column::Seq);

        let mut offset = 0;
        loop {
            let (page, full) = self.page(&select, offset, LATEST_PAGE).await?;
            if let Some(record) = page.into_iter().next() {
                return Ok(Some(record));
            }
            if !full {
                return Ok(None);
            }
            offset = offset.saturating_add(LATEST_PAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::test_db;
    use sea_orm::ConnectionTrait;
    use time::OffsetDateTime;
    use time::macros::datetime;
    use twin_registry_sdk::TelemetryValue;

    fn reading(ts: OffsetDateTime, value: f64) -> TelemetryRecord {
        TelemetryRecord {
            timestamp: ts,
            twin_id: "twin-1".to_owned(),
            name: "temperature".to_owned(),
            value: TelemetryValue::Numeric(value),
        }
    }

    fn numbers(records: &[TelemetryRecord]) -> Vec<f64> {
        records
            .iter()
            .filter_map(|r| r.value.as_numeric())
            .collect()
    }

    /// Store a reading the decoder rejects: SQLite reads `9e999` back as infinity.
    async fn insert_unreadable(
        repo: &SeaOrmTelemetryRepository,
        name: &str,
        ts: OffsetDateTime,
    ) {
        let micros = unix_micros_floor(ts).unwrap();
        repo.db
            .execute_unprepared(&format!(
                "INSERT INTO telemetry (twin_id, name, ts, value_numeric) \
                 VALUES ('twin-1', '{name}', {micros}, 9e999)"
            ))
            .await
            .unwrap();
    }

    async fn seeded() -> SeaOrmTelemetryRepository {
        let repo = SeaOrmTelemetryRepository::new(test_db::migrated().await);
        let written = repo
            .append_many(&[
                reading(datetime!(2024-03-01 08:00 UTC), 20.1),
                reading(datetime!(2024-03-01 08:05 UTC), 20.2),
                reading(datetime!(2024-03-01 08:10 UTC), 20.3),
            ])
            .await
            .unwrap();
        assert_eq!(written, 3);
        repo
    }

    #[tokio::test]
    async fn range_is_inclusive_and_ordered() {
        let repo = seeded().await;
        let query = TelemetryRangeQuery::new(
            "twin-1",
            "temperature",
            datetime!(2024-03-01 08:00 UTC),
            datetime!(2024-03-01 08:10 UTC),
        );
        assert_eq!(numbers(&repo.range(&query).await.unwrap()), [20.1, 20.2, 20.3]);

        let newest_two = query.descending().limit(2);
        assert_eq!(numbers(&repo.range(&newest_two).await.unwrap()), [20.3, 20.2]);
    }

    #[tokio::test]
    async fn ascending_limit_returns_the_oldest_readings() {
        let repo = seeded().await;
        let query = TelemetryRangeQuery::new(
            "twin-1",
            "temperature",
            datetime!(2024-03-01 08:00 UTC),
            datetime!(2024-03-01 08:10 UTC),
        )
        .limit(2);
        assert_eq!(numbers(&repo.range(&query).await.unwrap()), [20.1, 20.2]);
    }

    #[tokio::test]
    async fn limit_beyond_signed_range_is_unbounded() {
        let repo = seeded().await;
        for limit in [u64::MAX, (u64::MAX >> 1) + 1] {
            let query = TelemetryRangeQuery::new(
                "twin-1",
                "temperature",
                datetime!(2024-03-01 08:00 UTC),
                datetime!(2024-03-01 08:10 UTC),
            )
            .limit(limit);
            assert_eq!(numbers(&repo.range(&query).await.unwrap()), [20.1, 20.2, 20.3]);
        }
        assert_eq!(row_cap(0), None);
        assert_eq!(row_cap(u64::MAX >> 1), Some(u64::MAX >> 1));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn limited_range_reads_past_malformed_rows() {
        let repo = seeded().await;
        insert_unreadable(&repo, "temperature", datetime!(2024-03-01 08:02:30 UTC)).await;
        let query = TelemetryRangeQuery::new(
            "twin-1",
            "temperature",
            datetime!(2024-03-01 08:00 UTC),
            datetime!(2024-03-01 08:10 UTC),
        );

        assert_eq!(numbers(&repo.range(&query.clone().limit(2)).await.unwrap()), [20.1, 20.2]);
        assert_eq!(numbers(&repo.range(&query).await.unwrap()), [20.1, 20.2, 20.3]);
        assert!(logs_contain("Skipping malformed row"));
    }

    #[tokio::test]
    async fn latest_falls_back_past_malformed_newer_rows() {
        let repo = seeded().await;
        let newest = datetime!(2024-03-01 09:00 UTC);
        // More than one scan page of unreadable rows on top of the valid ones.
        for minute in 0..20 {
            insert_unreadable(&repo, "temperature", newest + time::Duration::minutes(minute)).await;
        }
        insert_unreadable(&repo, "pressure", newest).await;

        let latest = repo.latest("twin-1", "temperature").await.unwrap().unwrap();
        assert_eq!(latest.value, TelemetryValue::Numeric(20.3));
        assert_eq!(latest.timestamp, datetime!(2024-03-01 08:10 UTC));
        assert!(repo.latest("twin-1", "pressure").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn range_excludes_other_series() {
        let repo = seeded().await;
        let mut other = reading(datetime!(2024-03-01 08:05 UTC), 55.0);
        other.name = "humidity".to_owned();
        repo.append(&other).await.unwrap();

        let query = TelemetryRangeQuery::new(
            "twin-1",
            "temperature",
            datetime!(2024-03-01 08:01 UTC),
            datetime!(2024-03-01 08:09 UTC),
        );
        assert_eq!(numbers(&repo.range(&query).await.unwrap()), [20.2]);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let repo = SeaOrmTelemetryRepository::new(test_db::migrated().await);
        let ts = datetime!(2024-03-01 08:00 UTC);
        repo.append(&reading(ts, 1.0)).await.unwrap();
        repo.append(&reading(ts, 2.0)).await.unwrap();

        let query = TelemetryRangeQuery::new("twin-1", "temperature", ts, ts);
        assert_eq!(numbers(&repo.range(&query).await.unwrap()), [1.0, 2.0]);
        assert_eq!(
            repo.latest("twin-1", "temperature")
                .await
                .unwrap()
                .unwrap()
                .value,
            TelemetryValue::Numeric(2.0)
        );
    }

    #[tokio::test]
    async fn sub_micro_bounds_round_inward() {
        let repo = seeded().await;
        let query = TelemetryRangeQuery::new(
            "twin-1",
            "temperature",
            datetime!(2024-03-01 07:59:59.999_999_999 UTC),
            datetime!(2024-03-01 08:00:00.000_000_999 UTC),
        );
        assert_eq!(numbers(&repo.range(&query).await.unwrap()), [20.1]);
    }

    #[tokio::test]
    async fn text_and_boolean_values_round_trip() {
        let repo = SeaOrmTelemetryRepository::new(test_db::migrated().await);
        let ts = datetime!(2024-03-01 08:00 UTC);
        let mut mode = reading(ts, 0.0);
        mode.name = "mode".to_owned();
        mode.value = TelemetryValue::Text("heating".to_owned());
        let mut door = reading(ts, 0.0);
        door.name = "doorOpen".to_owned();
        door.value = TelemetryValue::Boolean(true);
        repo.append_many(&[mode.clone(), door.clone()]).await.unwrap();

        assert_eq!(repo.latest("twin-1", "mode").await.unwrap(), Some(mode));
        assert_eq!(repo.latest("twin-1", "doorOpen").await.unwrap(), Some(door));
        assert_eq!(
            repo.names("twin-1").await.unwrap(),
            ["doorOpen".to_owned(), "mode".to_owned()]
        );
        assert!(repo.latest("twin-1", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn storage_rejects_rows_with_two_values() {
        let repo = SeaOrmTelemetryRepository::new(test_db::migrated().await);
        let res = repo
            .db
            .execute_unprepared(
                "INSERT INTO telemetry (twin_id, name, ts, value_numeric, value_text) \
                 VALUES ('twin-1', 'x', 0, 1.0, 'one')",
            )
            .await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn empty_batch_writes_nothing() {
        let repo = SeaOrmTelemetryRepository::new(test_db::migrated().await);
        assert_eq!(repo.append_many(&[]).await.unwrap(), 0);
        assert!(repo.names("twin-1").await.unwrap().is_empty());
    }
}
