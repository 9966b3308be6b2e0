//! # Scene
//!
//! The retained-mode 2D scene the editor draws into and the user manipulates.
//!
//! [`Scene`] is the capability interface: anything that can create text and
//! rectangle objects, hold them, render a frame, report transform commits and
//! be disposed can host the editor. [`Surface`] is the built-in implementation
//! with hit testing, drag, handle resize and a display-list renderer.
//!
//! Scene objects carry no domain metadata. The editor keeps its own side table
//! from [`ObjectId`] to the layout item an object stands for.

mod color;
mod surface;

pub use color::Color;
pub use surface::{Handle, Surface, SurfaceStyle};

use crate::geometry::{Point, Rect, Size};

/// Advance width of one character as a fraction of the font size.
pub const TEXT_ADVANCE_RATIO: f64 = 0.6;
/// Line height as a fraction of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.16;

/// Identity of an object within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Style of a text object.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    pub bold: bool,
    pub fill: Color,
    /// Translucent box behind the glyphs so empty labels stay selectable.
    pub highlight: Color,
}

/// Style of a rectangle object.
#[derive(Debug, Clone, PartialEq)]
pub struct RectStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text(TextStyle),
    Rect(RectStyle),
}

/// An object placed in the scene.
///
/// `width`/`height` are the intrinsic size; resizing changes `scale_x` and
/// `scale_y`, so the on-canvas footprint is always [`SceneObject::bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub resizable: bool,
    pub shape: Shape,
}

impl SceneObject {
    /// Effective on-canvas footprint.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.width * self.scale_x,
            self.height * self.scale_y,
        )
    }
}

/// Estimated box of a single line of text: advance per character times the
/// character count (at least one) by one line height.
pub fn measure_text(content: &str, font_size: f64) -> Size {
    let chars = content.chars().count().max(1) as f64;
    Size::new(
        chars * font_size * TEXT_ADVANCE_RATIO,
        font_size * TEXT_LINE_HEIGHT,
    )
}

/// Fired once per committed transform (pointer release after a drag or
/// resize), carrying the object's canvas geometry at commit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectModified {
    pub object: ObjectId,
    pub bounds: Rect,
}

/// Pointer input in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
}

pub type ModifiedListener = Box<dyn FnMut(&ObjectModified)>;

/// One drawing instruction in a rendered [`Frame`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The background image stretched over the whole canvas.
    Background { size: Size },
    Rect {
        bounds: Rect,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    },
    Text {
        bounds: Rect,
        content: String,
        font_size: f64,
        font_family: String,
        bold: bool,
        fill: Color,
        highlight: Color,
    },
    SelectionOutline { bounds: Rect, color: Color },
    Handle { bounds: Rect, color: Color },
}

/// A display list, painted in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub canvas: Size,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Number of object commands (excludes background and selection chrome).
    pub fn object_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. } | DrawCommand::Text { .. }))
            .count()
    }
}

/// Capability interface of a retained-mode 2D scene.
pub trait Scene {
    /// Create (but do not add) a text object at `at`. Text objects size
    /// themselves from font and content and are never resizable.
    fn create_text_object(&mut self, style: TextStyle, at: Point) -> SceneObject;

    /// Create (but do not add) a rectangle covering `bounds`.
    fn create_rect_object(&mut self, style: RectStyle, bounds: Rect, resizable: bool)
    -> SceneObject;

    fn add_object(&mut self, object: SceneObject) -> ObjectId;

    /// Drop every object, the selection and any gesture in progress.
    fn remove_all_objects(&mut self);

    /// Set the canvas dimensions and whether a background is painted.
    fn set_canvas(&mut self, size: Size, has_background: bool);

    fn render(&self) -> Frame;

    /// Register a listener for transform commits.
    fn on_object_modified(&mut self, listener: ModifiedListener);

    fn handle_pointer(&mut self, event: PointerEvent);

    fn object(&self, id: ObjectId) -> Option<&SceneObject>;

    fn object_count(&self) -> usize;

    /// Release all objects and listeners. Every later call is a no-op.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}
