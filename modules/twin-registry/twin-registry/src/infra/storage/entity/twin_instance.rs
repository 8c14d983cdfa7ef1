use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

/// Property and tag containers are JSON objects; `null` reads back as empty.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "twin_instances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub model_id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub reported_properties: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub desired_properties: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::twin_model::Entity",
        from = "Column::ModelId",
        to = "super::twin_model::Column::Id",
        on_delete = "Restrict"
    )]
    TwinModel,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::twin_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TwinModel.def()
    }
}
