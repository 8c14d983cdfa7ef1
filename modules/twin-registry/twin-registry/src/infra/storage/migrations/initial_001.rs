use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => {
                r"
CREATE TABLE IF NOT EXISTS twin_models (
    id VARCHAR(255) PRIMARY KEY NOT NULL,
    display_name VARCHAR(255) NOT NULL,
    description TEXT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS twin_instances (
    id VARCHAR(255) PRIMARY KEY NOT NULL,
    model_id VARCHAR(255) NOT NULL REFERENCES twin_models(id) ON DELETE RESTRICT,
    reported_properties JSONB NOT NULL DEFAULT '{}'::jsonb,
    desired_properties JSONB NOT NULL DEFAULT '{}'::jsonb,
    tags JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_twin_instances_model_id ON twin_instances(model_id);

CREATE TABLE IF NOT EXISTS telemetry (
    seq BIGSERIAL PRIMARY KEY,
    twin_id VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    ts BIGINT NOT NULL,
    value_numeric DOUBLE PRECISION NULL,
    value_text TEXT NULL,
    value_boolean BOOLEAN NULL,
    CONSTRAINT chk_telemetry_single_value
        CHECK (num_nonnulls(value_numeric, value_text, value_boolean) = 1)
);

CREATE INDEX IF NOT EXISTS idx_telemetry_series_ts ON telemetry(twin_id, name, ts DESC);
                "
            }
            sea_orm::DatabaseBackend::MySql => {
                r"
CREATE TABLE IF NOT EXISTS twin_models (
    id VARCHAR(255) PRIMARY KEY NOT NULL,
    display_name VARCHAR(255) NOT NULL,
    description TEXT NULL,
    created_at TIMESTAMP(6) NOT NULL,
    updated_at TIMESTAMP(6) NOT NULL
);

CREATE TABLE IF NOT EXISTS twin_instances (
    id VARCHAR(255) PRIMARY KEY NOT NULL,
    model_id VARCHAR(255) NOT NULL,
    reported_properties JSON NOT NULL DEFAULT (JSON_OBJECT()),
    desired_properties JSON NOT NULL DEFAULT (JSON_OBJECT()),
    tags JSON NOT NULL DEFAULT (JSON_OBJECT()),
    created_at TIMESTAMP(6) NOT NULL,
    updated_at TIMESTAMP(6) NOT NULL,
    KEY idx_twin_instances_model_id (model_id),
    CONSTRAINT fk_twin_instances_model FOREIGN KEY (model_id)
        REFERENCES twin_models(id) ON DELETE RESTRICT
);

CREATE TABLE IF NOT EXISTS telemetry (
    seq BIGINT AUTO_INCREMENT PRIMARY KEY,
    twin_id VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    ts BIGINT NOT NULL,
    value_numeric DOUBLE NULL,
    value_text TEXT NULL,
    value_boolean BOOLEAN NULL,
    KEY idx_telemetry_series_ts (twin_id, name, ts DESC),
    CONSTRAINT chk_telemetry_single_value CHECK (
        (value_numeric IS NOT NULL) + (value_text IS NOT NULL) + (value_boolean IS NOT NULL) = 1
    )
);
                "
            }
            sea_orm::DatabaseBackend::Sqlite => {
                r"
CREATE TABLE IF NOT EXISTS twin_models (
    id TEXT PRIMARY KEY NOT NULL,
    display_name TEXT NOT NULL,
    description TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS twin_instances (
    id TEXT PRIMARY KEY NOT NULL,
    model_id TEXT NOT NULL REFERENCES twin_models(id) ON DELETE RESTRICT,
    reported_properties TEXT NOT NULL DEFAULT '{}',
    desired_properties TEXT NOT NULL DEFAULT '{}',
    tags TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_twin_instances_model_id ON twin_instances(model_id);

CREATE TABLE IF NOT EXISTS telemetry (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    twin_id TEXT NOT NULL,
    name TEXT NOT NULL,
    ts INTEGER NOT NULL,
    value_numeric REAL NULL,
    value_text TEXT NULL,
    value_boolean BOOLEAN NULL,
    CHECK (
        (value_numeric IS NOT NULL) + (value_text IS NOT NULL) + (value_boolean IS NOT NULL) = 1
    )
);

CREATE INDEX IF NOT EXISTS idx_telemetry_series_ts ON telemetry(twin_id, name, ts DESC);
                "
            }
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let sql = r"
DROP TABLE IF EXISTS telemetry;
DROP TABLE IF EXISTS twin_instances;
DROP TABLE IF EXISTS twin_models;
        ";
        conn.execute_unprepared(sql).await?;
        Ok(())
    }
}
