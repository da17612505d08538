// Configuration loading

pub mod catalog;
pub mod error;
pub mod settings;
pub mod snapshot;
pub mod store;

pub use catalog::CatalogFile;
pub use error::ConfigError;
pub use settings::Settings;
pub use snapshot::{BusinessRules, ConfigSnapshot, GenderVariant, UnknownOccupationPolicy};
pub use store::ConfigStore;
