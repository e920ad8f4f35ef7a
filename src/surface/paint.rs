use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidStyle(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Whether a shape is filled or stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

/// One stop of a linear gradient, with `offset` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// Linear-gradient shader descriptor, oriented along the filled shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub vertical: bool,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn validate(&self) -> ChartResult<()> {
        if self.stops.len() < 2 {
            return Err(ChartError::InvalidStyle(
                "gradient requires at least two stops".to_owned(),
            ));
        }
        let mut previous = 0.0_f64;
        for stop in &self.stops {
            if !stop.offset.is_finite() || !(0.0..=1.0).contains(&stop.offset) {
                return Err(ChartError::InvalidStyle(
                    "gradient stop offsets must be finite and in [0, 1]".to_owned(),
                ));
            }
            if stop.offset < previous {
                return Err(ChartError::InvalidStyle(
                    "gradient stop offsets must be non-decreasing".to_owned(),
                ));
            }
            previous = stop.offset;
            stop.color.validate()?;
        }
        Ok(())
    }
}

/// Full paint descriptor carried by every recorded draw command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Color,
    pub style: PaintStyle,
    pub stroke_width: f64,
    #[serde(default)]
    pub dash: Option<Vec<f64>>,
    #[serde(default)]
    pub gradient: Option<LinearGradient>,
}

impl Paint {
    #[must_use]
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            dash: None,
            gradient: None,
        }
    }

    #[must_use]
    pub fn stroke(color: Color, stroke_width: f64) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke,
            stroke_width,
            dash: None,
            gradient: None,
        }
    }

    #[must_use]
    pub fn with_dash(mut self, dash: Vec<f64>) -> Self {
        self.dash = Some(dash);
        self
    }

    #[must_use]
    pub fn with_gradient(mut self, gradient: LinearGradient) -> Self {
        self.gradient = Some(gradient);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.color.validate()?;
        if self.style == PaintStyle::Stroke
            && (!self.stroke_width.is_finite() || self.stroke_width <= 0.0)
        {
            return Err(ChartError::InvalidStyle(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        if let Some(dash) = &self.dash {
            if dash.is_empty() || dash.iter().any(|len| !len.is_finite() || *len <= 0.0) {
                return Err(ChartError::InvalidStyle(
                    "dash pattern lengths must be finite and > 0".to_owned(),
                ));
            }
        }
        if let Some(gradient) = &self.gradient {
            gradient.validate()?;
        }
        Ok(())
    }
}
