use crate::domain::{ColorValue, DeviceTarget};
use crate::sequence::{DurationSlot, Encoding};
use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    device: Device,
    sequence: SequenceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("LIGHTSTEP").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn sequence(&self) -> &SequenceConfig {
        &self.sequence
    }
}

#[derive(Debug, Deserialize)]
pub struct Device {
    url: String,
    #[serde(default, with = "humantime_serde")]
    timeout: Option<Duration>,
    #[serde(default)]
    encoding: Encoding,
}

impl Device {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Transport timeout for a single request; unset means the request waits as long as the
    /// connection stays up.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

#[derive(Debug, Deserialize)]
pub struct SequenceConfig {
    target: DeviceTarget,
    step_count: String,
    #[serde(default)]
    durations: Vec<DurationSlot>,
    #[serde(default)]
    colors: Vec<ColorValue>,
}

impl SequenceConfig {
    pub fn target(&self) -> &DeviceTarget {
        &self.target
    }

    /// Raw step count as entered; validated when the session is initialized.
    pub fn step_count(&self) -> &str {
        &self.step_count
    }

    pub fn durations(&self) -> &[DurationSlot] {
        &self.durations
    }

    pub fn colors(&self) -> &[ColorValue] {
        &self.colors
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                device: Device {
                    url: "http://lights.local:6789/".to_string(),
                    timeout: None,
                    encoding: Encoding::HsvTime,
                },
                sequence: SequenceConfig {
                    target: DeviceTarget::new("8c:aa:b5:7a:7d:13").unwrap(),
                    step_count: "3".to_string(),
                    durations: vec![],
                    colors: vec![],
                },
            },
        }
    }

    pub fn device_url(mut self, url: String) -> Self {
        self.config.device.url = url;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.device.timeout = Some(timeout);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.config.device.encoding = encoding;
        self
    }

    pub fn step_count(mut self, step_count: &str) -> Self {
        self.config.sequence.step_count = step_count.to_string();
        self
    }

    pub fn durations(mut self, durations: Vec<DurationSlot>) -> Self {
        self.config.sequence.durations = durations;
        self
    }

    pub fn colors(mut self, colors: Vec<ColorValue>) -> Self {
        self.config.sequence.colors = colors;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
