//! Utility functions for the chart reader.
//!
//! This module provides image loading, the diagnostics overlay, and logging
//! setup.

pub mod image;
pub mod visualization;

pub use self::image::{dynamic_to_gray, load_image, load_image_from_memory};
pub use visualization::{draw_overlay, save_overlay};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
