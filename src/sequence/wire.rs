use crate::sequence::step::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Request body flavours accepted by the device server under `update/<encoding>/<target>`.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Colors as `{r, g, b, h, s, v, hex}` objects.
    #[default]
    HsvTime,
    /// Colors packed as `0xRRGGBB` integers.
    RgbTime,
}

impl Encoding {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Encoding::HsvTime => "hsvtime",
            Encoding::RgbTime => "rgbtime",
        }
    }

    pub fn body<'a>(&self, sequence: &'a Sequence) -> RequestBody<'a> {
        match self {
            Encoding::HsvTime => RequestBody::HsvTime(sequence),
            Encoding::RgbTime => RequestBody::RgbTime(RgbTimeRequest {
                steps: sequence
                    .steps()
                    .iter()
                    .map(|step| RgbTimeStep {
                        time: step.time_ms(),
                        color: step.color().to_packed(),
                    })
                    .collect(),
            }),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestBody<'a> {
    HsvTime(&'a Sequence),
    RgbTime(RgbTimeRequest),
}

#[derive(Debug, Serialize)]
pub struct RgbTimeRequest {
    #[serde(rename = "Steps")]
    steps: Vec<RgbTimeStep>,
}

#[derive(Debug, Serialize)]
struct RgbTimeStep {
    time: u64,
    color: u32,
}
