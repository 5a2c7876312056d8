use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// A color as held by a color source: three 8-bit RGB components. The hex and HSV projections are
/// derived on demand and never stored.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ColorValue {
    red: u8,
    green: u8,
    blue: u8,
}

pub const WHITE: ColorValue = ColorValue::new(255, 255, 255);

impl ColorValue {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        ColorValue { red, green, blue }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Returns the color packed as `0xRRGGBB`.
    pub fn to_packed(&self) -> u32 {
        (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    /// Returns hue in degrees (0-359), saturation and value in percent (0-100), all rounded.
    pub fn to_hsv(&self) -> Hsv {
        let r = self.red as f64 / 255.0;
        let g = self.green as f64 / 255.0;
        let b = self.blue as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        Hsv {
            hue: hue.round() as u16 % 360,
            saturation: (saturation * 100.0).round() as u8,
            value: (max * 100.0).round() as u8,
        }
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        WHITE
    }
}

impl Display for ColorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ColorValue {
    type Err = ColorConversionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorConversionError::InvalidHexFormat(value.to_string()));
        }

        let channel = |start: usize| {
            u8::from_str_radix(&hex[start..start + 2], 16).map_err(|_| ColorConversionError::InvalidHexFormat(value.to_string()))
        };
        Ok(ColorValue::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Hsv {
    pub hue: u16,
    pub saturation: u8,
    pub value: u8,
}

#[derive(Error, Debug, PartialEq)]
pub enum ColorConversionError {
    #[error("invalid hexadecimal value '{0}'")]
    InvalidHexFormat(String),
}

impl Serialize for ColorValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct RawColor {
            r: u8,
            g: u8,
            b: u8,
            h: u16,
            s: u8,
            v: u8,
            hex: String,
        }

        let hsv = self.to_hsv();
        RawColor {
            r: self.red,
            g: self.green,
            b: self.blue,
            h: hsv.hue,
            s: hsv.saturation,
            v: hsv.value,
            hex: self.to_hex(),
        }
        .serialize(serializer)
    }
}
