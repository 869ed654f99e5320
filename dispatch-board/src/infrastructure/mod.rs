pub mod config;
mod notification_consumer;
mod repository;
mod service_provider;
pub mod telemetry;

pub use notification_consumer::notification_consumer;
pub use service_provider::ServiceProvider;
