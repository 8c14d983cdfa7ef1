//! Infrastructure layer: storage adapters behind the domain repository ports.

pub mod storage;
