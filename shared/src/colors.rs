use std::fmt;

use serde::{Serialize, Serializer};

/// Sequential blue palette used for the education choropleth, lightest first.
pub const EDUCATION_PALETTE: [&str; 7] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c",
];

/// Fill for regions that have no matching statistic.
pub const NO_DATA_COLOR: &str = "#ccc";

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` or the `#rgb` shorthand. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, digit) in channels.iter_mut().zip(hex.chars()) {
                    let v = digit.to_digit(16)? as u8;
                    *slot = v * 16 + v;
                }
                Some(Self(channels[0], channels[1], channels[2]))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self(r, g, b))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{EDUCATION_PALETTE, NO_DATA_COLOR, Rgb};

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#08519c"), Some(Rgb(0x08, 0x51, 0x9c)));
        assert_eq!(Rgb::from_hex("08519C"), Some(Rgb(0x08, 0x51, 0x9c)));
        assert_eq!(Rgb::from_hex("#ccc"), Some(Rgb(0xcc, 0xcc, 0xcc)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
        assert_eq!(Rgb::from_hex("#éé"), None);
    }

    #[test]
    fn display_is_lowercase_long_form() {
        assert_eq!(Rgb(0xcc, 0xcc, 0xcc).to_string(), "#cccccc");
        assert_eq!(Rgb(8, 81, 156).to_hex(), "#08519c");
    }

    #[test]
    fn builtin_palette_parses_and_excludes_fallback() {
        let fallback = Rgb::from_hex(NO_DATA_COLOR).expect("fallback parses");
        for hex in EDUCATION_PALETTE {
            let color = Rgb::from_hex(hex).expect("palette entry parses");
            assert_ne!(color, fallback);
        }
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb(255, 0, 16)).expect("serialize");
        assert_eq!(json, "\"#ff0010\"");
    }
}
