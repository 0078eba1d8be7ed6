use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque 8-bit RGB colour, rendered as `#rrggbb`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour {0:?}: expected #rgb, #rrggbb or a basic colour name")]
pub struct ColorParseError(pub String);

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let trimmed = s.trim();
        let named = match trimmed.to_ascii_lowercase().as_str() {
            "white" => Some(Self::WHITE),
            "black" => Some(Self::BLACK),
            "gray" | "grey" => Some(Self::GRAY),
            "red" => Some(Self::RED),
            _ => None,
        };
        if let Some(c) = named {
            return Ok(c);
        }

        let err = || ColorParseError(s.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Rolling hash over the concatenated filter names.
///
/// `hash = unit + (hash << 5) - hash` per UTF-16 code unit, in wrapping
/// 32-bit arithmetic. Order-sensitive.
pub fn filter_hash<S: AsRef<str>>(filters: &[S]) -> i32 {
    filters
        .iter()
        .flat_map(|f| f.as_ref().encode_utf16().collect::<Vec<_>>())
        .fold(0i32, |hash, unit| {
            i32::from(unit)
                .wrapping_add(hash.wrapping_shl(5))
                .wrapping_sub(hash)
        })
}

/// Deterministic colour for an instrument's filter list.
///
/// Red, green and blue are bytes 0, 1 and 2 of [`filter_hash`].
pub fn filter_color<S: AsRef<str>>(filters: &[S]) -> Color {
    let hash = filter_hash(filters);
    let channel = |i: i32| ((hash >> (i * 8)) & 0xff) as u8;
    Color::rgb(channel(0), channel(1), channel(2))
}

#[cfg(test)]
mod tests {
    use super::{Color, filter_color, filter_hash};

    #[test]
    fn gri_hash_is_stable() {
        assert_eq!(filter_hash(&["g", "r", "i"]), 102_622);
        assert_eq!(filter_color(&["g", "r", "i"]).to_hex(), "#de9001");
        assert_eq!(
            filter_color(&["g", "r", "i"]),
            filter_color(&["g".to_string(), "r".to_string(), "i".to_string()])
        );
    }

    #[test]
    fn concatenation_defines_the_hash() {
        assert_eq!(filter_hash(&["gr", "i"]), filter_hash(&["g", "ri"]));
    }

    #[test]
    fn order_changes_the_colour() {
        assert_ne!(filter_color(&["g", "r"]), filter_color(&["r", "g"]));
    }

    #[test]
    fn empty_filter_list_is_black() {
        let none: [&str; 0] = [];
        assert_eq!(filter_color(&none), Color::BLACK);
    }

    #[test]
    fn long_lists_wrap_without_panicking() {
        let filters: Vec<String> = (0..200).map(|i| format!("ztf_{i}")).collect();
        let a = filter_color(&filters);
        let b = filter_color(&filters);
        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 7);
    }

    #[test]
    fn negative_hash_channels_are_masked() {
        let filters = ["ps1::g"];
        assert_eq!(filter_hash(&filters), -980_780_071);
        assert_eq!(filter_color(&filters).to_hex(), "#d97b8a");
    }

    #[test]
    fn ztf_filters_match_known_colour() {
        assert_eq!(filter_color(&["ztfg", "ztfr", "ztfi"]).to_hex(), "#7ec245");
    }

    #[test]
    fn parse_forms() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#FF0000").unwrap(), Color::RED);
        assert_eq!(Color::parse("grey").unwrap(), Color::GRAY);
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("teal").is_err());
        assert!(Color::parse("#ééé").is_err());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102ff\"");
        let back: Color = serde_json::from_str("\"gray\"").unwrap();
        assert_eq!(back, Color::GRAY);
    }
}
