use serde::{Deserialize, Serialize};

/// An RGBA color with components in the 0-255 range.
///
/// Components are carried as floats and passed through to render commands
/// untouched; interpretation (sRGB, premultiplication, ...) is up to the
/// renderer. An alpha of 0 means "not drawn".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 255.0 }
    }

    pub fn gray(value: f32) -> Self {
        Self::rgb(value, value, value)
    }

    /// Whether this color would produce visible output.
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_invisible() {
        assert!(!Color::default().is_visible());
        assert!(Color::rgb(0.0, 0.0, 0.0).is_visible());
    }
}
