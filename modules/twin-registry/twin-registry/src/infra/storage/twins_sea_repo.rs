//! SeaORM implementation of [`TwinsRepository`].
//!
//! Partial updates only `Set` the columns they own, so SeaORM emits an
//! `UPDATE` naming exactly those columns plus `updated_at`.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, Unchanged,
};
use time::OffsetDateTime;
use twin_registry_sdk::{PropertyMap, TwinInstance, TwinInstanceUpdate};

use super::db::{Violation, constraint_violation, db_err, is_missing_row, query_rows};
use super::entity::twin_instance::{ActiveModel, Column, Entity as TwinEntity, Model};
use super::mapper::{decode_raw_rows, properties_to_json, tags_to_json};
use crate::domain::error::DomainError;
use crate::domain::repos::TwinsRepository;

pub struct SeaOrmTwinsRepository {
    db: DatabaseConnection,
}

impl SeaOrmTwinsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn write(&self, id: &str, m: ActiveModel) -> Result<TwinInstance, DomainError> {
        let model_id = match &m.model_id {
            ActiveValue::Set(model_id) => Some(model_id.clone()),
            _ => None,
        };
        let row = m
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, id, model_id.as_deref()))?;
        TwinInstance::try_from(row).map_err(DomainError::from)
    }
}

fn write_err(e: DbErr, twin_id: &str, model_id: Option<&str>) -> DomainError {
    if is_missing_row(&e) {
        return DomainError::twin_not_found(twin_id);
    }
    match (constraint_violation(&e), model_id) {
        (Some(Violation::ForeignKey), Some(model_id)) => {
            DomainError::invalid_model_reference(model_id)
        }
        (Some(Violation::Unique), _) => DomainError::twin_already_exists(twin_id),
        _ => db_err(e),
    }
}

fn untouched(id: &str, updated_at: OffsetDateTime) -> ActiveModel {
    ActiveModel {
        id: Unchanged(id.to_owned()),
        model_id: NotSet,
        reported_properties: NotSet,
        desired_properties: NotSet,
        tags: NotSet,
        created_at: NotSet,
        updated_at: Set(updated_at),
    }
}

#[async_trait]
impl TwinsRepository for SeaOrmTwinsRepository {
    async fn get(&self, id: &str) -> Result<Option<TwinInstance>, DomainError> {
        let found = TwinEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        found
            .map(TwinInstance::try_from)
            .transpose()
            .map_err(DomainError::from)
    }

    async fn list(&self) -> Result<Vec<TwinInstance>, DomainError> {
        let rows = query_rows(&self.db, &TwinEntity::find().order_by_asc(Column::Id)).await?;
        Ok(decode_raw_rows::<Model, _>(&rows, "twin_instances", "id"))
    }

    async fn list_by_model(&self, model_id: &str) -> Result<Vec<TwinInstance>, DomainError> {
        let select = TwinEntity::find()
            .filter(Column::ModelId.eq(model_id))
            .order_by_asc(Column::Id);
        let rows = query_rows(&self.db, &select).await?;
        Ok(decode_raw_rows::<Model, _>(&rows, "twin_instances", "id"))
    }

    async fn count_by_model(&self, model_id: &str) -> Result<u64, DomainError> {
        TwinEntity::find()
            .filter(Column::ModelId.eq(model_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let count = TwinEntity::find_by_id(id.to_owned())
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, twin: TwinInstance) -> Result<TwinInstance, DomainError> {
        let m = ActiveModel {
            id: Set(twin.id.clone()),
            model_id: Set(twin.model_id.clone()),
            reported_properties: Set(properties_to_json(&twin.reported_properties)),
            desired_properties: Set(properties_to_json(&twin.desired_properties)),
            tags: Set(tags_to_json(&twin.tags)),
            created_at: Set(twin.created_at),
            updated_at: Set(twin.updated_at),
        };

        let row = m
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, &twin.id, Some(&twin.model_id)))?;
        TwinInstance::try_from(row).map_err(DomainError::from)
    }

    async fn update(
        &self,
        id: &str,
        update: &TwinInstanceUpdate,
        updated_at: OffsetDateTime,
    ) -> Result<TwinInstance, DomainError> {
        let mut m = untouched(id, updated_at);
        if let Some(model_id) = &update.model_id {
            m.model_id = Set(model_id.clone());
        }
        if let Some(desired) = &update.desired_properties {
            m.desired_properties = Set(properties_to_json(desired));
        }
        if let Some(tags) = &update.tags {
            m.tags = Set(tags_to_json(tags));
        }
        self.write(id, m).await
    }

    async fn update_reported(
        &self,
        id: &str,
        properties: &PropertyMap,
        updated_at: OffsetDateTime,
    ) -> Result<TwinInstance, DomainError> {
        let mut m = untouched(id, updated_at);
        m.reported_properties = Set(properties_to_json(properties));
        self.write(id, m).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let res = TwinEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}
