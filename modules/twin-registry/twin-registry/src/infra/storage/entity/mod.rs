pub mod telemetry;
pub mod twin_instance;
pub mod twin_model;
