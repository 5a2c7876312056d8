use crate::domain::color::ColorValue;
use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawColor {
            Hex(String),
            Rgb { r: u8, g: u8, b: u8 },
        }

        match RawColor::deserialize(deserializer)? {
            RawColor::Hex(s) => s
                .parse::<ColorValue>()
                .map_err(|_| Error::invalid_value(Unexpected::Str(&s), &"a 6-digit hex color")),
            RawColor::Rgb { r, g, b } => Ok(ColorValue::new(r, g, b)),
        }
    }
}
