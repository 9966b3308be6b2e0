//! # Geometry
//!
//! Plain value types for sizes, points and rectangles, plus the uniform
//! fit-to-container computation that maps image space onto canvas space.
//!
//! Image space is the coordinate system of the unscaled background image.
//! Canvas space is the on-screen rendering. A [`Fit`] converts between them.

use serde::{Deserialize, Serialize};

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if either side is non-positive or not finite.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// A point in either image or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge. [`Rect::contains`] counts it as inside.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge. [`Rect::contains`] counts it as inside.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Square of side `side` centered on `center`.
    pub fn centered_square(center: Point, side: f64) -> Self {
        let half = side / 2.0;
        Self::new(center.x - half, center.y - half, side, side)
    }
}

/// Result of fitting an image into a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fit {
    /// Size of the scaled rendering, never larger than the container.
    pub canvas: Size,
    /// Image → canvas scale factor (uniform on both axes).
    pub scale: f64,
}

impl Fit {
    /// Image-space length → canvas-space length.
    #[inline]
    pub fn to_canvas(&self, v: f64) -> f64 {
        v * self.scale
    }

    /// Canvas-space length → image-space length.
    #[inline]
    pub fn to_image(&self, v: f64) -> f64 {
        v / self.scale
    }

    pub fn point_to_canvas(&self, p: Point) -> Point {
        Point::new(self.to_canvas(p.x), self.to_canvas(p.y))
    }

    pub fn point_to_image(&self, p: Point) -> Point {
        Point::new(self.to_image(p.x), self.to_image(p.y))
    }

    pub fn rect_to_canvas(&self, r: Rect) -> Rect {
        Rect::new(
            self.to_canvas(r.x),
            self.to_canvas(r.y),
            self.to_canvas(r.width),
            self.to_canvas(r.height),
        )
    }

    pub fn rect_to_image(&self, r: Rect) -> Rect {
        Rect::new(
            self.to_image(r.x),
            self.to_image(r.y),
            self.to_image(r.width),
            self.to_image(r.height),
        )
    }
}

/// Scale `image` uniformly to the largest size that fits inside `container`.
///
/// If the container is relatively wider than the image, the result is fit to
/// the container height (pillarbox); otherwise it is fit to the container
/// width (letterbox). Returns `None` when either size is empty.
pub fn fit_within(image: Size, container: Size) -> Option<Fit> {
    if image.is_empty() || container.is_empty() {
        return None;
    }

    let image_aspect = image.aspect();
    let canvas = if container.aspect() > image_aspect {
        Size::new(container.height * image_aspect, container.height)
    } else {
        Size::new(container.width, container.width / image_aspect)
    };

    Some(Fit {
        canvas,
        scale: canvas.width / image.width,
    })
}
