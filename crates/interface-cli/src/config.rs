mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{CommandOverrides, build_config};
pub use models::AppConfig;
