use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::surface::Color;

/// Ordered series color cycle consulted when no override applies.
///
/// Indexing wraps, so any series index resolves to a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> ChartResult<Self> {
        if colors.is_empty() {
            return Err(ChartError::InvalidStyle(
                "palette requires at least one color".to_owned(),
            ));
        }
        for color in &colors {
            color.validate()?;
        }
        Ok(Self { colors })
    }

    /// Ten-color default cycle.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            colors: vec![
                Color::rgb(0.204, 0.486, 0.792),
                Color::rgb(0.886, 0.424, 0.224),
                Color::rgb(0.306, 0.655, 0.353),
                Color::rgb(0.827, 0.294, 0.333),
                Color::rgb(0.573, 0.467, 0.769),
                Color::rgb(0.549, 0.380, 0.310),
                Color::rgb(0.863, 0.545, 0.765),
                Color::rgb(0.498, 0.498, 0.498),
                Color::rgb(0.741, 0.741, 0.227),
                Color::rgb(0.255, 0.714, 0.769),
            ],
        }
    }

    #[must_use]
    pub fn color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}
