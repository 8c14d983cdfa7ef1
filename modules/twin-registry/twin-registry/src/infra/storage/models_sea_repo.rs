//! SeaORM implementation of [`ModelsRepository`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait, QueryOrder, Set,
    Unchanged,
};
use time::OffsetDateTime;
use twin_registry_sdk::{TwinModel, TwinModelUpdate};

use super::db::{Violation, constraint_violation, db_err, is_missing_row, query_rows};
use super::entity::twin_model::{ActiveModel, Column, Entity as ModelEntity, Model};
use super::mapper::decode_raw_rows;
use crate::domain::error::DomainError;
use crate::domain::repos::ModelsRepository;

pub struct SeaOrmModelsRepository {
    db: DatabaseConnection,
}

impl SeaOrmModelsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModelsRepository for SeaOrmModelsRepository {
    async fn get(&self, id: &str) -> Result<Option<TwinModel>, DomainError> {
        let found = ModelEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        found
            .map(TwinModel::try_from)
            .transpose()
            .map_err(DomainError::from)
    }

    async fn list(&self) -> Result<Vec<TwinModel>, DomainError> {
        let rows = query_rows(&self.db, &ModelEntity::find().order_by_asc(Column::Id)).await?;
        Ok(decode_raw_rows::<Model, _>(&rows, "twin_models", "id"))
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let count = ModelEntity::find_by_id(id.to_owned())
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, model: TwinModel) -> Result<TwinModel, DomainError> {
        let m = ActiveModel {
            id: Set(model.id.clone()),
            display_name: Set(model.display_name.clone()),
            description: Set(model.description.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        };

        let row = m.insert(&self.db).await.map_err(|e| {
            if constraint_violation(&e) == Some(Violation::Unique) {
                DomainError::model_already_exists(&model.id)
            } else {
                db_err(e)
            }
        })?;
        TwinModel::try_from(row).map_err(DomainError::from)
    }

    async fn update(
        &self,
        id: &str,
        update: &TwinModelUpdate,
        updated_at: OffsetDateTime,
    ) -> Result<TwinModel, DomainError> {
        let m = ActiveModel {
            id: Unchanged(id.to_owned()),
            display_name: Set(update.display_name.clone()),
            description: Set(update.description.clone()),
            created_at: NotSet,
            updated_at: Set(updated_at),
        };

        let row = m.update(&self.db).await.map_err(|e| {
            if is_missing_row(&e) {
                DomainError::model_not_found(id)
            } else {
                db_err(e)
            }
        })?;
        TwinModel::try_from(row).map_err(DomainError::from)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let res = ModelEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await
            .map_err(|e| {
                if constraint_violation(&e) == Some(Violation::ForeignKey) {
                    DomainError::model_in_use(id)
                } else {
                    db_err(e)
                }
            })?;
        Ok(res.rows_affected > 0)
    }
}
