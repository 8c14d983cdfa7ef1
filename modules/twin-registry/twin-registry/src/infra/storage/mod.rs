//! SeaORM-backed storage for the twin registry.

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod models_sea_repo;
pub mod telemetry_sea_repo;
pub mod twins_sea_repo;

pub use models_sea_repo::SeaOrmModelsRepository;
pub use telemetry_sea_repo::SeaOrmTelemetryRepository;
pub use twins_sea_repo::SeaOrmTwinsRepository;
