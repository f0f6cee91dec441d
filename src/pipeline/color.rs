use std::ops::{Add, Mul};

/// Struct, representing raw rgba8 pixel data.
/// Every way of building or combining colors clamps channels to [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const BLACK: Color = Color { r: 0,   g: 0,   b: 0,   a: 255 };
pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

fn clamp_channel(value: i32) -> u8 {
    return value.clamp(0, 255) as u8;
}

// NaN goes to 0 through the saturating float cast.
fn clamp_channel_f32(value: f32) -> u8 {
    return value.clamp(0.0, 255.0) as u8;
}

impl Color {
    /// Opaque color from integer channels, each clamped to [0, 255].
    pub fn rgb(r: i32, g: i32, b: i32) -> Color {
        return Color::rgba(r, g, b, 255);
    }

    pub fn rgba(r: i32, g: i32, b: i32, a: i32) -> Color {
        return Color {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        };
    }

    /// Color from normalized channels, [0.0, 1.0] maps onto [0, 255].
    /// Values outside the range are clamped, alpha is opaque.
    pub fn from_normalized(r: f32, g: f32, b: f32) -> Color {
        return Color::from_normalized_rgba(r, g, b, 1.0);
    }

    pub fn from_normalized_rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        return Color {
            r: clamp_channel_f32(r * 255.0),
            g: clamp_channel_f32(g * 255.0),
            b: clamp_channel_f32(b * 255.0),
            a: clamp_channel_f32(a * 255.0),
        };
    }

    /// Opaque grey of the given normalized intensity.
    pub fn grey(intensity: f32) -> Color {
        return Color::from_normalized(intensity, intensity, intensity);
    }

    /// Channels as rgb8 triple, alpha dropped.
    pub fn to_rgb(self) -> [u8; 3] {
        return [self.r, self.g, self.b];
    }
}

impl Default for Color {
    fn default() -> Self {
        return BLACK;
    }
}

impl Add<Color> for Color {
    type Output = Color;

    /// Saturating per channel add.
    fn add(self, rhs: Color) -> Color {
        return Color {
            r: self.r.saturating_add(rhs.r),
            g: self.g.saturating_add(rhs.g),
            b: self.b.saturating_add(rhs.b),
            a: self.a.saturating_add(rhs.a),
        };
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    /// Scales every channel, alpha included, then clamps.
    fn mul(self, factor: f32) -> Color {
        return Color {
            r: clamp_channel_f32(self.r as f32 * factor),
            g: clamp_channel_f32(self.g as f32 * factor),
            b: clamp_channel_f32(self.b as f32 * factor),
            a: clamp_channel_f32(self.a as f32 * factor),
        };
    }
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, color: Color) -> Color {
        return color * self;
    }
}
