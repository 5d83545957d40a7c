//! Colour gradients for the two-tone background and after-images

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradientError {
    #[error("gradient needs at least 2 steps, got {0}")]
    TooFewSteps(usize),
    #[error("invalid hex colour {0:?}")]
    BadColor(String),
}

/// Split 0xRRGGBB into channels
#[inline]
fn channels(color: u32) -> [u32; 3] {
    [(color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF]
}

/// `steps` colours from `start` to `end` inclusive, interpolated per channel
///
/// Channel values are truncated toward zero.
pub fn gradation(start: u32, end: u32, steps: usize) -> Result<Vec<u32>, GradientError> {
    if steps < 2 {
        return Err(GradientError::TooFewSteps(steps));
    }
    let from = channels(start);
    let to = channels(end);

    Ok((0..steps)
        .map(|i| {
            let factor = i as f64 / (steps - 1) as f64;
            let mix = |a: u32, b: u32| (a as f64 + (b as f64 - a as f64) * factor) as i64 as u32;
            let r = mix(from[0], to[0]);
            let g = mix(from[1], to[1]);
            let b = mix(from[2], to[2]);
            (r << 16) | (g << 8) | b
        })
        .collect())
}

/// Parse `2b335f`, `0x2b335f` or `#2b335f`
pub fn parse_hex_color(text: &str) -> Result<u32, GradientError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);
    let value =
        u32::from_str_radix(digits, 16).map_err(|_| GradientError::BadColor(text.to_string()))?;
    if value > 0xFF_FF_FF {
        return Err(GradientError::BadColor(text.to_string()));
    }
    Ok(value)
}

/// Default 8-colour night-sky ramp
pub fn night_sky() -> Result<Vec<u32>, GradientError> {
    use crate::consts::{GRADIENT_END, GRADIENT_START, GRADIENT_STEPS};
    gradation(GRADIENT_START, GRADIENT_END, GRADIENT_STEPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        let g = gradation(0x2b335f, 0xA9C1FF, 8).unwrap();
        assert_eq!(g.len(), 8);
        assert_eq!(g[0], 0x2b335f);
        assert_eq!(g[7], 0xA9C1FF);
    }

    #[test]
    fn test_midpoint_truncates() {
        // Red channel 0 → 255 over 3 steps: 0, 127.5 → 127, 255
        let g = gradation(0x000000, 0xFF0000, 3).unwrap();
        assert_eq!(g, vec![0x000000, 0x7F0000, 0xFF0000]);
    }

    #[test]
    fn test_descending_channels() {
        let g = gradation(0xFFFFFF, 0x000000, 2).unwrap();
        assert_eq!(g, vec![0xFFFFFF, 0x000000]);
        let g = gradation(0x0000FF, 0x000000, 4).unwrap();
        assert_eq!(g, vec![0xFF, 0xAA, 0x55, 0x00]);
    }

    #[test]
    fn test_too_few_steps() {
        assert_eq!(gradation(0, 0, 1), Err(GradientError::TooFewSteps(1)));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("2b335f"), Ok(0x2b335f));
        assert_eq!(parse_hex_color("0xA9C1FF"), Ok(0xA9C1FF));
        assert_eq!(parse_hex_color("#ffffff"), Ok(0xFFFFFF));
        assert!(parse_hex_color("zzz").is_err());
        assert!(parse_hex_color("1000000").is_err());
    }

    #[test]
    fn test_night_sky_has_eight_colors() {
        let ramp = night_sky().unwrap();
        assert_eq!(ramp.len(), 8);
        assert_eq!(ramp[0], crate::consts::GRADIENT_START);
        assert_eq!(ramp[7], crate::consts::GRADIENT_END);
    }
}
