//! Fixtures for interacting with deployed applications.

pub mod app_client;

pub use app_client::{AppClient, EnvironmentSnapshot};
