//! Layout item types.
//!
//! All types derive `Serialize + Deserialize` so the same values work for
//! Rust construction and for the JSON records the host application stores.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Edge length (image pixels) of a placeholder with no stored size.
pub const DEFAULT_PLACEHOLDER_SIZE: f64 = 50.0;

fn default_font_size() -> f64 {
    16.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_color() -> String {
    "#000000".to_string()
}

/// What a layout item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A text field. Bounds follow the font; never resized directly.
    Text,
    /// A rectangular region reserved for an image (photo, signature, logo).
    #[serde(rename = "image", alias = "image_placeholder")]
    ImagePlaceholder,
}

impl ItemKind {
    /// Whether scene objects of this kind get resize handles.
    pub fn is_resizable(self) -> bool {
        matches!(self, ItemKind::ImagePlaceholder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// One positioned field within a template.
///
/// `x`, `y`, `width` and `height` are in image space: pixels of the original,
/// unscaled background image.
///
/// ## Example (JSON)
///
/// ```json
/// {"id": "name", "type": "text", "x": 120, "y": 340, "label": "Student Name",
///  "fontSize": 32, "fontFamily": "Georgia", "fontWeight": "bold", "color": "#1a1a1a"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub id: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: ItemKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Text content (only meaningful for text items).
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// CSS-style color: `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a basic name.
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl LayoutItem {
    /// A text item with default styling.
    pub fn text(id: impl Into<String>, label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind: ItemKind::Text,
            x,
            y,
            label: label.into(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: FontWeight::Normal,
            color: default_color(),
            width: None,
            height: None,
        }
    }

    /// An image placeholder with an explicit size.
    pub fn image(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind: ItemKind::ImagePlaceholder,
            width: Some(width),
            height: Some(height),
            ..Self::text(id, "", x, y)
        }
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = FontWeight::Bold;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Placeholder footprint in image space, falling back to the default size.
    pub fn placeholder_bounds(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.width.unwrap_or(DEFAULT_PLACEHOLDER_SIZE),
            self.height.unwrap_or(DEFAULT_PLACEHOLDER_SIZE),
        )
    }
}
