// Adapters - External system implementations

pub mod http_provider;
pub mod local_media;
pub mod mock_provider;
pub mod sim_media;
pub mod tracing_log;
pub mod toml_config;

// Re-export adapters
pub use http_provider::{HttpAnalysisAdapter, ProviderSettings};
pub use local_media::LocalMediaAdapter;
pub use mock_provider::MockAnalysisAdapter;
pub use sim_media::SimulatedMediaHandle;
pub use tracing_log::TracingLogAdapter;
pub use toml_config::TomlConfigAdapter;
