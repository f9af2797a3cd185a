pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod state;
pub mod utils;
pub mod web;

pub use api::*;
pub use config::Config;
pub use error::{GatewayError, LegError};
pub use gateway::{Acquired, DataGateway, FallbackCause};
pub use models::*;
pub use state::DashboardState;
pub use utils::*;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honouring `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
