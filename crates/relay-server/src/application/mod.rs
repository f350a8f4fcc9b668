//! Application layer: the relay use case.

pub mod relay_service;

pub use relay_service::RelayService;
