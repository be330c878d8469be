pub mod actions;
pub mod cli;
pub mod credentials;
pub mod osm_parser;
pub mod seeding;
pub mod services;
pub mod static_places;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the fmt subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,data_ingestion=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
