use crate::app_config::{AppConfig, SequenceConfig};
use crate::sequence::StepSequenceModel;
use crate::session::Session;
use crate::transmitter::{SequenceSink, SequenceTransmitter};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};

mod app_config;
mod color_source;
mod domain;
mod sequence;
mod session;
mod transmitter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let transmitter: Arc<dyn SequenceSink> = Arc::new(SequenceTransmitter::from_config(&config)?);
    info!("✅  Initialized transmitter for {}", config.device().url());

    let mut session = Session::new();
    compose(&mut session, config.sequence())?;
    let steps = session.model().map(StepSequenceModel::len).unwrap_or_default();
    info!(device_target = ?session.target().map(|t| t.as_str()), "✅  Composed sequence of {} step(s)", steps);

    let completion = session.dispatch(transmitter)?;
    completion.wait().await?;

    info!("🔥 Sequence delivered");
    Ok(())
}

/// Builds the session the operator would have composed by hand: fixes the step count, applies the
/// configured colors and durations in order and selects the first step.
fn compose(session: &mut Session, sequence: &SequenceConfig) -> Result<(), Box<dyn Error>> {
    let model = session.initialize(sequence.step_count())?;

    for (index, color) in sequence.colors().iter().enumerate() {
        model.source_mut().set_color(index, *color)?;
    }
    for (index, slot) in sequence.durations().iter().enumerate() {
        if !slot.is_empty() {
            model.set_duration(index, slot.ticks())?;
        }
    }
    model.select(0)?;

    let views = model.views();
    debug!(event = ?views.last_event().map(|e| e.name()), "🎨 Rendered {} swatch(es)", views.color_list().len());
    for swatch in views.color_list() {
        debug!("🎨 {}", swatch);
    }
    if let Some(active) = views.active() {
        debug!("🎯 Active {}", active);
    }

    session.set_target(sequence.target().clone());
    Ok(())
}
