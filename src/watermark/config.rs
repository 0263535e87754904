//! Watermark configuration types.
//!
//! This module defines the watermark options surface:
//! - `WatermarkOptions`: every field optional, as read from a config file or
//!   command-line overrides
//! - `WatermarkSettings`: the same fields resolved against their defaults
//!
//! Merging uses explicit presence, never truthiness: an explicit `margin: 0`
//! or `opacity: 0.0` is a real value and is kept.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TEXT: &str = "Watermark";
pub const DEFAULT_FONT_SIZE: u32 = 32;
pub const DEFAULT_FONT_COLOR: &str = "#ffffff";
pub const DEFAULT_OPACITY: f32 = 0.5;
pub const DEFAULT_MARGIN: u32 = 20;
pub const DEFAULT_SCALE: f32 = 0.2;

/// Which overlay strategy is active for an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    Text,
    Image,
}

impl WatermarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl FromStr for WatermarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(format!(
                "unknown watermark type '{}', expected text or image",
                other
            )),
        }
    }
}

impl fmt::Display for WatermarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anchor corner of the watermark on the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl WatermarkPosition {
    pub const ALL: [WatermarkPosition; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Margin is measured from the bottom edge.
    pub fn is_bottom(&self) -> bool {
        self.as_str().contains("bottom")
    }

    /// Margin is measured from the right edge.
    pub fn is_right(&self) -> bool {
        self.as_str().contains("right")
    }
}

impl FromStr for WatermarkPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown position '{}', expected one of top-left, top-right, bottom-left, bottom-right",
                    s
                )
            })
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Watermark options with every field optional.
///
/// ```yaml
/// type: image
/// image_path: ./assets/logo.png
/// position: top-left
/// margin: 0
/// scale: 0.25
/// ```
///
/// The camelCase names (`imagePath`, `fontSize`, `fontColor`) are accepted
/// as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatermarkOptions {
    /// Overlay strategy (default: text)
    #[serde(rename = "type", alias = "kind", skip_serializing_if = "Option::is_none")]
    pub kind: Option<WatermarkKind>,

    /// Text to render in text mode (default: "Watermark")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Overlay image path in image mode (default: "")
    #[serde(alias = "imagePath", skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Glyph size in pixels (default: 32)
    #[serde(alias = "fontSize", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,

    /// Text fill color (default: "#ffffff")
    #[serde(alias = "fontColor", skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,

    /// Text opacity from 0.0 to 1.0 (default: 0.5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,

    /// Anchor corner (default: bottom-right)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<WatermarkPosition>,

    /// Inset from the anchor edges in pixels (default: 20)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,

    /// Overlay width as a fraction of the source width (default: 0.2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl WatermarkOptions {
    /// Layer `overrides` on top of `self`. A field set in `overrides` wins,
    /// whatever its value.
    pub fn merge(&self, overrides: &WatermarkOptions) -> WatermarkOptions {
        WatermarkOptions {
            kind: overrides.kind.or(self.kind),
            text: overrides.text.clone().or_else(|| self.text.clone()),
            image_path: overrides
                .image_path
                .clone()
                .or_else(|| self.image_path.clone()),
            font_size: overrides.font_size.or(self.font_size),
            font_color: overrides
                .font_color
                .clone()
                .or_else(|| self.font_color.clone()),
            opacity: overrides.opacity.or(self.opacity),
            position: overrides.position.or(self.position),
            margin: overrides.margin.or(self.margin),
            scale: overrides.scale.or(self.scale),
        }
    }

    /// Fill every absent field with its default.
    pub fn resolve(&self) -> WatermarkSettings {
        WatermarkSettings {
            kind: self.kind.unwrap_or_default(),
            text: self.text.clone().unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            image_path: self.image_path.clone().unwrap_or_default(),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            font_color: self
                .font_color
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_COLOR.to_string()),
            opacity: self.opacity.unwrap_or(DEFAULT_OPACITY),
            position: self.position.unwrap_or_default(),
            margin: self.margin.unwrap_or(DEFAULT_MARGIN),
            scale: self.scale.unwrap_or(DEFAULT_SCALE),
        }
    }
}

/// Fully resolved watermark options for a single invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatermarkSettings {
    pub kind: WatermarkKind,
    pub text: String,
    pub image_path: String,
    pub font_size: u32,
    pub font_color: String,
    pub opacity: f32,
    pub position: WatermarkPosition,
    pub margin: u32,
    pub scale: f32,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        WatermarkOptions::default().resolve()
    }
}

impl WatermarkSettings {
    /// Validate the fields used by the active kind. Fields belonging to the
    /// other kind are ignored.
    pub fn validate(&self) -> Result<(), String> {
        match self.kind {
            WatermarkKind::Text => {
                if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
                    return Err(format!(
                        "Text watermark opacity must be a finite value between 0.0 and 1.0, got {}",
                        self.opacity
                    ));
                }
                if self.font_size == 0 {
                    return Err("Text watermark font_size must be greater than 0".to_string());
                }
            }
            WatermarkKind::Image => {
                if !self.scale.is_finite() || self.scale <= 0.0 {
                    return Err(format!(
                        "Image watermark scale must be a finite value greater than 0.0, got {}",
                        self.scale
                    ));
                }
            }
        }

        Ok(())
    }
}
