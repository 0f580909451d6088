mod app_config;

pub use app_config::{
    AppConfig, BackendConfig, DataConfig, EditorConfig, LogFormat, LoggingConfig, MetricsConfig,
    ServerConfig, StorageBackend, StorageSettings,
};
