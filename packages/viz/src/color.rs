//! Blue-to-red HSV color ramp for grid cell counts.

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// CSS `rgb(r,g,b)` rendering.
    #[must_use]
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Maps `value` within `[min, max]` onto a hue ramp from blue (240°, low)
/// to red (0°, high) at full saturation and value.
///
/// Values outside the range clamp to its ends. A degenerate range
/// (`max <= min`) maps everything to the hot end instead of producing
/// NaN.
#[must_use]
pub fn color_for_value(value: f64, min: f64, max: f64) -> Rgb {
    let span = max - min;
    let t = if span > 0.0 {
        ((value - min) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let hue = 240.0 * (1.0 - t);
    hsv_to_rgb(hue)
}

/// HSV to RGB at saturation 1.0 and value 1.0.
#[allow(clippy::many_single_char_names)]
fn hsv_to_rgb(hue: f64) -> Rgb {
    let c = 1.0;
    let x = c * (1.0 - ((hue / 60.0).rem_euclid(2.0) - 1.0).abs());

    let (r, g, b) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = |v: f64| (v * 255.0).round() as u8;

    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}
