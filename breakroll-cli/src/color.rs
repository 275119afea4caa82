//! Color string normalization for theme overrides.
//!
//! Accepts `#rgb`, `#rrggbb`, and `rgb(r, g, b)`; anything else maps to
//! [`FALLBACK_COLOR`]. Never fails.
use once_cell::sync::Lazy;
use regex::Regex;

pub const FALLBACK_COLOR: &str = "#000000";

static HEX_COLOR: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").ok());

static RGB_COLOR: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^rgb\s*\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").ok()
});

/// Normalize to lowercase `#rrggbb`.
#[must_use]
pub fn normalize_color(input: &str) -> String {
    let value = input.trim();
    if let Some(hex) = HEX_COLOR.as_ref().and_then(|re| re.captures(value)) {
        let digits = hex[1].to_ascii_lowercase();
        if digits.len() == 3 {
            let doubled: String = digits.chars().flat_map(|c| [c, c]).collect();
            return format!("#{doubled}");
        }
        return format!("#{digits}");
    }
    if let Some(rgb) = RGB_COLOR.as_ref().and_then(|re| re.captures(value)) {
        let channel = |i: usize| rgb[i].parse::<u16>().map_or(0, |v| v.min(255));
        return format!("#{:02x}{:02x}{:02x}", channel(1), channel(2), channel(3));
    }
    FALLBACK_COLOR.to_string()
}

/// Split `#rrggbb` into channels, for terminal truecolor swatches.
#[must_use]
pub fn channels(hex: &str) -> (u8, u8, u8) {
    let normalized = normalize_color(hex);
    let byte = |range: std::ops::Range<usize>| {
        normalized
            .get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
            .unwrap_or(0)
    };
    (byte(1..3), byte(3..5), byte(5..7))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms_are_normalized() {
        assert_eq!(normalize_color("#ABCDEF"), "#abcdef");
        assert_eq!(normalize_color(" #f0a "), "#ff00aa");
    }

    #[test]
    fn rgb_functions_are_converted_and_clamped() {
        assert_eq!(normalize_color("rgb(37, 99, 235)"), "#2563eb");
        assert_eq!(normalize_color("RGB( 300 ,0,1 )"), "#ff0001");
    }

    #[test]
    fn everything_else_falls_back() {
        for input in ["", "blue", "#12", "#1234567", "rgba(1,2,3,0.5)", "rgb(1,2)"] {
            assert_eq!(normalize_color(input), FALLBACK_COLOR, "input {input:?}");
        }
    }

    #[test]
    fn channels_split_hex() {
        assert_eq!(channels("#2563eb"), (0x25, 0x63, 0xeb));
        assert_eq!(channels("nonsense"), (0, 0, 0));
    }
}
