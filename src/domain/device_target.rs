use serde::Deserialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Opaque identifier of the controller that receives a sequence, typically its MAC address. It is
/// sent as a single path segment; encoding happens when the request URL is built.
#[derive(PartialEq, Eq, Clone, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct DeviceTarget(String);

impl DeviceTarget {
    pub fn new(value: impl Into<String>) -> Result<Self, TargetError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TargetError::Empty);
        }
        if value == "." || value == ".." {
            return Err(TargetError::DotSegment(value));
        }
        Ok(DeviceTarget(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceTarget {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DeviceTarget::new(value)
    }
}

impl Display for DeviceTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum TargetError {
    #[error("device target must not be empty")]
    Empty,
    #[error("device target {0:?} would not survive as a path segment")]
    DotSegment(String),
}
