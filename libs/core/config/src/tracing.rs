use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre for binaries embedding the estimator.
///
/// Shows the file:line where an error was raised and hides the environment
/// section. Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware configuration and error span capture.
///
/// - **Production** (`APP_ENV=production`): JSON events flattened for log
///   aggregation, module targets hidden, `info` and above.
/// - **Development** (default): pretty output at `debug`, which includes
///   missing prices and skipped resources.
///
/// Both install the `tracing-error` ErrorLayer so span traces are available
/// to color-eyre reports. `RUST_LOG` overrides the level, e.g.
/// `RUST_LOG=domain_cost_estimation=trace`.
///
/// Calling this more than once is harmless; later calls are ignored.
///
/// ```ignore
/// use core_config::{tracing::init_tracing, Environment, FromEnv};
/// use core_config::estimation::EstimationConfig;
///
/// init_tracing(&Environment::from_env());
/// let config = EstimationConfig::from_env()?;
/// let estimator = Estimator::from_config(&config)?;
/// ```
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("debug")
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => {
            info!(?environment, "Tracing initialized");
        }
        Err(_) => {
            // Already initialized (common in tests)
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }
}
