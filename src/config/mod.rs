pub mod credentials;
pub mod loader;
pub mod store;
pub mod types;

pub use credentials::{CredentialStore, CredentialStoreError, SecureString};
pub use loader::ConfigError;
pub use store::ConfigStore;
pub use types::{ApiConfig, Config, LocationConfig, LoggingConfig, RefreshConfig};
