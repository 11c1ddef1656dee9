use crate::error::ColorError;

/// An RGBA color with channels normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Creates a new color from normalized channels.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with the given alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Returns a standard palette entry, wrapping around the palette length.
    #[must_use]
    pub fn from_palette(index: usize) -> Self {
        STANDARD_PALETTE[index % STANDARD_PALETTE.len()]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::from_palette(1)
    }
}

/// Subset colors used when a morphology element carries no usable color.
pub const STANDARD_PALETTE: [Rgba; 8] = [
    Rgba::new(0.0, 0.0, 1.0, 1.0),
    Rgba::new(1.0, 0.0, 0.0, 1.0),
    Rgba::new(0.0, 1.0, 0.0, 1.0),
    Rgba::new(1.0, 1.0, 0.0, 1.0),
    Rgba::new(0.0, 1.0, 1.0, 1.0),
    Rgba::new(1.0, 0.0, 1.0, 1.0),
    Rgba::new(1.0, 0.5, 0.0, 1.0),
    Rgba::new(0.5, 0.5, 0.5, 1.0),
];

/// Decodes Neurolucida `#RRGGBB` color attributes into subset colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver {
    fallback: Rgba,
}

impl ColorResolver {
    /// Creates a resolver that returns `fallback` for strings without a `#`.
    #[must_use]
    pub fn new(fallback: Rgba) -> Self {
        Self {
            fallback: fallback.with_alpha(1.0),
        }
    }

    /// Resolves a raw color attribute.
    ///
    /// The three channels are read as hex byte pairs starting right after the
    /// first `#`; anything before the `#` and after the sixth digit is ignored.
    /// Alpha is always `1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::Truncated`] if fewer than six characters follow
    /// the `#`, or [`ColorError::InvalidHex`] if any of them is not a hex digit.
    pub fn resolve(&self, raw: &str) -> Result<Rgba, ColorError> {
        let Some(hash) = raw.find('#') else {
            return Ok(self.fallback);
        };

        let digits = &raw.as_bytes()[hash + 1..];
        if digits.len() < 6 {
            return Err(ColorError::Truncated { raw: raw.into() });
        }

        let mut channels = [0.0; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            *channel = f64::from(hex_byte(pair).ok_or_else(|| ColorError::InvalidHex {
                raw: raw.into(),
            })?) / 255.0;
        }

        Ok(Rgba::new(channels[0], channels[1], channels[2], 1.0))
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::new(Rgba::default())
    }
}

/// Decodes two ASCII hex digits into a byte.
fn hex_byte(pair: &[u8]) -> Option<u8> {
    let hi = char::from(pair[0]).to_digit(16)?;
    let lo = char::from(pair[1]).to_digit(16)?;
    u8::try_from(hi * 16 + lo).ok()
}
