//! In-memory repositories for service unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use time::macros::datetime;
use twin_registry_sdk::{
    PropertyMap, SortOrder, TagMap, TelemetryRangeQuery, TelemetryRecord, TwinInstance,
    TwinInstanceUpdate, TwinModel, TwinModelUpdate,
};

use crate::domain::error::DomainError;
use crate::domain::repos::{ModelsRepository, TelemetryRepository, TwinsRepository};

const CREATED: OffsetDateTime = datetime!(2024-01-01 00:00:00 UTC);

pub fn sample_model(id: &str) -> TwinModel {
    TwinModel {
        id: id.to_owned(),
        display_name: format!("Model {id}"),
        description: None,
        created_at: CREATED,
        updated_at: CREATED,
    }
}

pub fn sample_twin(id: &str, model_id: &str) -> TwinInstance {
    TwinInstance {
        id: id.to_owned(),
        model_id: model_id.to_owned(),
        reported_properties: PropertyMap::new(),
        desired_properties: PropertyMap::new(),
        tags: TagMap::new(),
        created_at: CREATED,
        updated_at: CREATED,
    }
}

#[derive(Default)]
pub struct InMemoryModels {
    rows: Mutex<BTreeMap<String, TwinModel>>,
    delete_failure: Mutex<Option<DomainError>>,
}

impl InMemoryModels {
    pub fn put(&self, model: TwinModel) {
        self.rows.lock().unwrap().insert(model.id.clone(), model);
    }

    /// Make the next delete fail as if a storage constraint fired.
    pub fn fail_delete_with(&self, err: DomainError) {
        *self.delete_failure.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl ModelsRepository for InMemoryModels {
    async fn get(&self, id: &str) -> Result<Option<TwinModel>, DomainError> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<TwinModel>, DomainError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.rows.lock().unwrap().contains_key(id))
    }

    async fn insert(&self, model: TwinModel) -> Result<TwinModel, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&model.id) {
            return Err(DomainError::model_already_exists(&model.id));
        }
        rows.insert(model.id.clone(), model.clone());
        Ok(model)
    }

    async fn update(
        &self,
        id: &str,
        update: &TwinModelUpdate,
        updated_at: OffsetDateTime,
    ) -> Result<TwinModel, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let model = rows
            .get_mut(id)
            .ok_or_else(|| DomainError::model_not_found(id))?;
        model.display_name.clone_from(&update.display_name);
        model.description.clone_from(&update.description);
        model.updated_at = updated_at;
        Ok(model.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        if let Some(err) = self.delete_failure.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.rows.lock().unwrap().remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryTwins {
    rows: Mutex<BTreeMap<String, TwinInstance>>,
    insert_failure: Mutex<Option<DomainError>>,
}

impl InMemoryTwins {
    pub fn put(&self, twin: TwinInstance) {
        self.rows.lock().unwrap().insert(twin.id.clone(), twin);
    }

    /// Make the next insert fail as if a storage constraint fired.
    pub fn fail_insert_with(&self, err: DomainError) {
        *self.insert_failure.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl TwinsRepository for InMemoryTwins {
    async fn get(&self, id: &str) -> Result<Option<TwinInstance>, DomainError> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<TwinInstance>, DomainError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn list_by_model(&self, model_id: &str) -> Result<Vec<TwinInstance>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.model_id == model_id)
            .cloned()
            .collect())
    }

    async fn count_by_model(&self, model_id: &str) -> Result<u64, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().filter(|t| t.model_id == model_id).count() as u64)
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.rows.lock().unwrap().contains_key(id))
    }

    async fn insert(&self, twin: TwinInstance) -> Result<TwinInstance, DomainError> {
        if let Some(err) = self.insert_failure.lock().unwrap().take() {
            return Err(err);
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&twin.id) {
            return Err(DomainError::twin_already_exists(&twin.id));
        }
        rows.insert(twin.id.clone(), twin.clone());
        Ok(twin)
    }

    async fn update(
        &self,
        id: &str,
        update: &TwinInstanceUpdate,
        updated_at: OffsetDateTime,
    ) -> Result<TwinInstance, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let twin = rows
            .get_mut(id)
            .ok_or_else(|| DomainError::twin_not_found(id))?;
        if let Some(model_id) = &update.model_id {
            twin.model_id.clone_from(model_id);
        }
        if let Some(desired) = &update.desired_properties {
            twin.desired_properties.clone_from(desired);
        }
        if let Some(tags) = &update.tags {
            twin.tags.clone_from(tags);
        }
        twin.updated_at = updated_at;
        Ok(twin.clone())
    }

    async fn update_reported(
        &self,
        id: &str,
        properties: &PropertyMap,
        updated_at: OffsetDateTime,
    ) -> Result<TwinInstance, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let twin = rows
            .get_mut(id)
            .ok_or_else(|| DomainError::twin_not_found(id))?;
        twin.reported_properties.clone_from(properties);
        twin.updated_at = updated_at;
        Ok(twin.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.rows.lock().unwrap().remove(id).is_some())
    }
}

/// Insertion-ordered telemetry log with optional artificial read latency.
#[derive(Default)]
pub struct InMemoryTelemetry {
    rows: Mutex<Vec<TelemetryRecord>>,
    read_delay: Option<Duration>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryTelemetry {
    pub fn with_read_delay(delay: Duration) -> Self {
        Self {
            read_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn read_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn before_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TelemetryRepository for InMemoryTelemetry {
    async fn append(&self, record: &TelemetryRecord) -> Result<(), DomainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn append_many(&self, records: &[TelemetryRecord]) -> Result<u64, DomainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn range(
        &self,
        query: &TelemetryRangeQuery,
    ) -> Result<Vec<TelemetryRecord>, DomainError> {
        self.before_read().await;
        let mut hits: Vec<TelemetryRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.twin_id == query.twin_id
                    && r.name == query.name
                    && r.timestamp >= query.start
                    && r.timestamp <= query.end
            })
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal timestamps.
        hits.sort_by_key(|r| r.timestamp);
        if query.order == SortOrder::Descending {
            hits.reverse();
        }
        if query.limit > 0 {
            hits.truncate(usize::try_from(query.limit).unwrap_or(usize::MAX));
        }
        Ok(hits)
    }

    async fn names(&self, twin_id: &str) -> Result<Vec<String>, DomainError> {
        self.before_read().await;
        let mut names: Vec<String> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.twin_id == twin_id)
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn latest(
        &self,
        twin_id: &str,
        name: &str,
    ) -> Result<Option<TelemetryRecord>, DomainError> {
        self.before_read().await;
        let rows = self.rows.lock().unwrap();
        let mut best: Option<&TelemetryRecord> = None;
        for r in rows.iter().filter(|r| r.twin_id == twin_id && r.name == name) {
            if best.is_none_or(|b| r.timestamp >= b.timestamp) {
                best = Some(r);
            }
        }
        Ok(best.cloned())
    }
}
