pub mod api;
pub mod config;
pub mod logging;
pub mod transport;
#[cfg(feature = "async-transport")]
pub mod transport_axum;

use config::ServiceConfig;
use store::MovieStore;
use transport::MovieRuntime;

/// Builds the runtime described by `config`, seeded unless seeding is disabled.
pub fn build_runtime(config: &ServiceConfig) -> MovieRuntime {
    let store = if config.seed {
        MovieStore::with_seed()
    } else {
        MovieStore::new()
    };
    MovieRuntime::in_memory(store).with_status_codes(config.status_codes)
}
