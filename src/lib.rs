pub mod account;
pub mod adapter;
pub mod arn;
pub mod cache;
pub mod config;
pub mod dynamodb;
pub mod error;
pub mod item;
pub mod registry;
pub mod utils;
pub mod web;

pub use adapter::{Adapter, AdapterOptions};
pub use error::{ErrorKind, QueryError, Result};
pub use item::{Item, Query, QueryMethod};
pub use registry::AdapterRegistry;

pub const ENV_PORT: &str = "PORT";
pub const ENV_CONFIG_PATH: &str = "AWS_SOURCE_CONFIG_PATH";
pub const ENV_DYNAMODB_ENDPOINT_URL: &str = "DYNAMODB_ENDPOINT_URL";
pub const ENV_AWS_ACCOUNT_ID: &str = "AWS_ACCOUNT_ID";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
