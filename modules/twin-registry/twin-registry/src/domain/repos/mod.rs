//! Repository ports consumed by the domain services.

mod models_repo;
mod telemetry_repo;
mod twins_repo;

pub use models_repo::ModelsRepository;
pub use telemetry_repo::TelemetryRepository;
pub use twins_repo::TwinsRepository;
