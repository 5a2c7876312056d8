use crate::app_config::AppConfig;
use crate::domain::DeviceTarget;
use crate::sequence::{Encoding, Sequence};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{info, instrument, warn};

pub fn new_client(config: &AppConfig) -> Result<Client, TransmissionError> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.device().timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Something that accepts a finished sequence for a device. Delivery is at most once: a failure is
/// returned to the caller and never retried here.
#[async_trait]
pub trait SequenceSink: Debug + Send + Sync {
    async fn submit(&self, target: &DeviceTarget, sequence: &Sequence) -> Result<(), TransmissionError>;
}

/// Posts sequences to `<base url>/update/<encoding>/<target>` as JSON.
#[derive(Debug, Clone)]
pub struct SequenceTransmitter {
    client: Client,
    base_url: Url,
    encoding: Encoding,
}

impl SequenceTransmitter {
    pub fn new(client: Client, base_url: &str, encoding: Encoding) -> Result<Self, TransmissionError> {
        let base_url = Url::parse(base_url).map_err(|e| TransmissionError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransmissionError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(SequenceTransmitter { client, base_url, encoding })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TransmissionError> {
        SequenceTransmitter::new(new_client(config)?, config.device().url(), config.device().encoding())
    }

    /// The request URL for `target`. The target always ends up as exactly one percent-encoded path
    /// segment.
    pub fn endpoint(&self, target: &DeviceTarget) -> Result<Url, TransmissionError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransmissionError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["update", self.encoding.path_segment(), target.as_str()]);
        Ok(url)
    }
}

#[async_trait]
impl SequenceSink for SequenceTransmitter {
    #[instrument(skip_all, fields(device_target = %target))]
    async fn submit(&self, target: &DeviceTarget, sequence: &Sequence) -> Result<(), TransmissionError> {
        let url = self.endpoint(target)?;
        info!("📤 Submitting {} sequence of {} step(s)...", self.encoding, sequence.len());

        let response = match self.client.post(url).json(&self.encoding.body(sequence)).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("📤 Submitting sequence... failed, {}", e);
                return Err(TransmissionError::Request(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status_code = %status, "📤 Submitting sequence... failed, the device server responded with {:?}", body);
            return Err(TransmissionError::Status { status, body });
        }

        info!(status_code = %status, "📤 Submitting sequence... OK");
        Ok(())
    }
}

/// Completion notification of a dispatched submission.
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<Result<(), TransmissionError>>,
}

impl Completion {
    pub async fn wait(self) -> Result<(), TransmissionError> {
        self.rx.await.unwrap_or(Err(TransmissionError::Dropped))
    }
}

/// Submits on a spawned task so the caller does not wait for the device. Must be called from
/// within a tokio runtime.
pub fn dispatch(sink: Arc<dyn SequenceSink>, target: DeviceTarget, sequence: Sequence) -> Completion {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = sink.submit(&target, &sequence).await;
        // The caller may have stopped listening, the outcome is logged either way
        let _ = tx.send(result);
    });

    Completion { rx }
}

#[derive(Error, Debug)]
pub enum TransmissionError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("device server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid device server url '{0}'")]
    InvalidBaseUrl(String),
    #[error("submission ended without reporting an outcome")]
    Dropped,
}
