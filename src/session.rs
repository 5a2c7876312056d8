use crate::color_source::{ActiveColor, ColorSourceError};
use crate::domain::DeviceTarget;
use crate::sequence::{Sequence, SequenceError, SelectionError, StepCount, StepCountError, StepSequenceModel};
use crate::transmitter::{Completion, SequenceSink, TransmissionError, dispatch};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Everything one operator session works on: the step model, once initialized, and the device the
/// sequence goes to. Owned by the caller and passed explicitly.
#[derive(Debug, Default)]
pub struct Session {
    model: Option<StepSequenceModel>,
    target: Option<DeviceTarget>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    #[cfg(test)]
    pub fn from_model(model: StepSequenceModel) -> Self {
        Session {
            model: Some(model),
            target: None,
        }
    }

    /// Parses the raw step count and fixes the number of steps for the rest of the session.
    /// Nothing is allocated when the count is invalid.
    pub fn initialize(&mut self, step_count: &str) -> Result<&mut StepSequenceModel, SessionError> {
        let count = step_count.parse::<StepCount>()?;
        self.initialize_with(count)
    }

    #[instrument(skip(self))]
    pub fn initialize_with(&mut self, count: StepCount) -> Result<&mut StepSequenceModel, SessionError> {
        if let Some(model) = &self.model {
            return Err(SessionError::AlreadyInitialized { steps: model.len() });
        }

        let model = StepSequenceModel::initialize(count)?;
        info!("🔢 Initialized a sequence of {} step(s)", count.get());
        Ok(self.model.insert(model))
    }

    pub fn set_target(&mut self, target: DeviceTarget) {
        debug!(device_target = %target, "🎯 Selected device");
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<&DeviceTarget> {
        self.target.as_ref()
    }

    pub fn model(&self) -> Option<&StepSequenceModel> {
        self.model.as_ref()
    }

    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        self.model.as_mut().ok_or(SelectionError::UninitializedSelection)?.select(index)
    }

    pub fn active_color(&self) -> Result<ActiveColor, SelectionError> {
        self.model
            .as_ref()
            .map(StepSequenceModel::active_color)
            .ok_or(SelectionError::UninitializedSelection)
    }

    /// Validates the session and builds the sequence. Runs before anything leaves the process.
    fn prepare(&self) -> Result<(DeviceTarget, Sequence), SubmitError> {
        let model = self.model.as_ref().ok_or(SubmitError::Uninitialized)?;
        let target = self.target.clone().ok_or(SubmitError::MissingDeviceTarget)?;
        Ok((target, model.sequence()?))
    }

    /// Submits the current sequence and waits for the outcome.
    pub async fn submit(&self, sink: &dyn SequenceSink) -> Result<(), SubmitError> {
        let (target, sequence) = self.prepare()?;
        sink.submit(&target, &sequence).await?;
        Ok(())
    }

    /// Submits the current sequence on a background task. Validation errors are returned right
    /// away; the transmission outcome arrives through the returned completion.
    pub fn dispatch(&self, sink: Arc<dyn SequenceSink>) -> Result<Completion, SubmitError> {
        let (target, sequence) = self.prepare()?;
        Ok(dispatch(sink, target, sequence))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    InvalidStepCount(#[from] StepCountError),
    #[error("the session already holds {steps} step(s), the step count cannot change")]
    AlreadyInitialized { steps: usize },
    #[error(transparent)]
    ColorSource(#[from] ColorSourceError),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("no sequence has been initialized yet")]
    Uninitialized,
    #[error("no device target selected")]
    MissingDeviceTarget,
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Transmission(#[from] TransmissionError),
}
