//! Orchestration layer: scenario generation and daily question services.

pub mod ask_service;
pub mod qotd_service;
pub mod seeds;
pub mod telemetry;

pub use ask_service::{AskPurposelyService, ServiceState};
pub use qotd_service::DailyQuestionService;
pub use telemetry::{TelemetryEvent, TelemetryKind, TelemetrySink};

use std::sync::Arc;

use purposely_core::error::Result;
use purposely_core::time::SystemClock;
use purposely_infrastructure::{ConfigService, JsonFileStore, paths};
use purposely_interaction::{ClaudeApiGenerator, ProfileContext};

/// Wires the default production stack: file-backed store in the data
/// directory, config from the config file, the Claude generator from
/// environment variables, and a shared telemetry channel.
pub fn bootstrap(
    context: ProfileContext,
    user_key: impl Into<String>,
) -> Result<(
    AskPurposelyService,
    DailyQuestionService,
    tokio::sync::mpsc::UnboundedReceiver<TelemetryEvent>,
)> {
    let config = ConfigService::new().get_config();
    let store: Arc<dyn purposely_core::storage::KeyValueStore> =
        Arc::new(JsonFileStore::new(paths::default_data_dir()?)?);
    let generator = Arc::new(ClaudeApiGenerator::try_from_env()?);
    let clock = Arc::new(SystemClock);
    let (telemetry, events) = TelemetrySink::channel();

    let ask = AskPurposelyService::new(
        generator.clone(),
        store.clone(),
        clock.clone(),
        context.clone(),
        user_key,
        config.clone(),
        telemetry.clone(),
    );
    let daily = DailyQuestionService::new(generator, store, clock, context, config, telemetry);

    Ok((ask, daily, events))
}
