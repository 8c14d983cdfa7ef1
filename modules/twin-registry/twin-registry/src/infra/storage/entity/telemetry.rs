use sea_orm::entity::prelude::*;

/// One telemetry reading.
///
/// `seq` is a storage row id that orders readings with equal timestamps by
/// insertion. `ts` holds unix microseconds (UTC). Exactly one `value_*`
/// column is non-null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "telemetry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub twin_id: String,
    pub name: String,
    pub ts: i64,
    #[sea_orm(column_type = "Double")]
    pub value_numeric: Option<f64>,
    pub value_text: Option<String>,
    pub value_boolean: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
