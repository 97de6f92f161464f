use crate::foundation::error::{PreviewError, PreviewResult};

/// Straight (non-premultiplied) 24-bit RGB color.
///
/// Serialized as a `#rrggbb` hex string so config files and pattern documents stay readable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Construct from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub const fn from_u24(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_u24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn parse_hex(s: &str) -> PreviewResult<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PreviewError::validation(format!(
                "invalid color '{s}', expected #rrggbb"
            )));
        }
        let v = u32::from_str_radix(hex, 16)
            .map_err(|e| PreviewError::validation(format!("invalid color '{s}': {e}")))?;
        Ok(Self::from_u24(v))
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Opaque RGBA8 bytes.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Move each channel towards white (`amount > 0`) or black (`amount < 0`).
    ///
    /// `amount` is clamped to `[-1, 1]`.
    pub fn shade(self, amount: f32) -> Self {
        let amount = amount.clamp(-1.0, 1.0);
        let f = |c: u8| -> u8 {
            let c = f32::from(c);
            let out = if amount >= 0.0 {
                c + (255.0 - c) * amount
            } else {
                c * (1.0 + amount)
            };
            out.round().clamp(0.0, 255.0) as u8
        };
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
