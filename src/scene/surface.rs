//! Built-in retained-mode scene with selection, drag and handle resize.

use super::{
    Color, DrawCommand, Frame, ModifiedListener, ObjectId, ObjectModified, PointerEvent,
    RectStyle, Scene, SceneObject, Shape, TextStyle, measure_text,
};
use crate::geometry::{Point, Rect, Size};

/// Visual and interaction tuning for a [`Surface`].
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceStyle {
    /// Side length of the square resize handles, in canvas pixels.
    pub handle_size: f64,
    pub handle_color: Color,
    pub selection_color: Color,
    /// Smallest width/height a resize may produce.
    pub min_object_size: f64,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            handle_size: 8.0,
            handle_color: Color::rgb(37, 99, 235),
            selection_color: Color::rgb(37, 99, 235),
            min_object_size: 1.0,
        }
    }
}

/// Resize handle positions around a selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    /// Where this handle sits on `r`.
    pub fn anchor(self, r: Rect) -> Point {
        let cx = r.x + r.width / 2.0;
        let cy = r.y + r.height / 2.0;
        match self {
            Handle::TopLeft => Point::new(r.x, r.y),
            Handle::Top => Point::new(cx, r.y),
            Handle::TopRight => Point::new(r.right(), r.y),
            Handle::Right => Point::new(r.right(), cy),
            Handle::BottomRight => Point::new(r.right(), r.bottom()),
            Handle::Bottom => Point::new(cx, r.bottom()),
            Handle::BottomLeft => Point::new(r.x, r.bottom()),
            Handle::Left => Point::new(r.x, cy),
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Left | Handle::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::Right | Handle::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Top | Handle::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::Bottom | Handle::BottomRight)
    }

    /// Apply a pointer delta to `origin`, keeping the opposite edges fixed.
    pub fn resize(self, origin: Rect, dx: f64, dy: f64, min: f64) -> Rect {
        let (mut left, mut right) = (origin.x, origin.right());
        let (mut top, mut bottom) = (origin.y, origin.bottom());

        if self.moves_left() {
            left = (left + dx).min(right - min);
        }
        if self.moves_right() {
            right = (right + dx).max(left + min);
        }
        if self.moves_top() {
            top = (top + dy).min(bottom - min);
        }
        if self.moves_bottom() {
            bottom = (bottom + dy).max(top + min);
        }

        Rect::new(left, top, right - left, bottom - top)
    }
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Move {
        id: ObjectId,
        start: Point,
        origin: Point,
        moved: bool,
    },
    Resize {
        id: ObjectId,
        handle: Handle,
        start: Point,
        origin: Rect,
        moved: bool,
    },
}

/// Retained-mode scene: objects in z-order (last is topmost).
pub struct Surface {
    style: SurfaceStyle,
    canvas: Size,
    has_background: bool,
    objects: Vec<SceneObject>,
    next_id: u64,
    selected: Option<ObjectId>,
    gesture: Option<Gesture>,
    listeners: Vec<ModifiedListener>,
    disposed: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SurfaceStyle::default())
    }
}

impl Surface {
    pub fn new(style: SurfaceStyle) -> Self {
        Self {
            style,
            canvas: Size::default(),
            has_background: false,
            objects: Vec::new(),
            next_id: 1,
            selected: None,
            gesture: None,
            listeners: Vec::new(),
            disposed: false,
        }
    }

    pub fn style(&self) -> &SurfaceStyle {
        &self.style
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<ObjectId>) {
        if self.disposed {
            return;
        }
        self.selected = id.filter(|id| self.objects.iter().any(|o| o.id == *id));
    }

    /// Topmost object whose bounds contain `p`.
    pub fn hit_test(&self, p: Point) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.bounds().contains(p))
            .map(|o| o.id)
    }

    /// Handle squares of `object`, empty unless it is resizable.
    pub fn handle_rects(&self, object: &SceneObject) -> Vec<(Handle, Rect)> {
        if !object.resizable {
            return Vec::new();
        }
        let bounds = object.bounds();
        Handle::ALL
            .iter()
            .map(|&h| (h, Rect::centered_square(h.anchor(bounds), self.style.handle_size)))
            .collect()
    }

    /// Resize handle of the selected object under `p`, if any.
    pub fn handle_at(&self, p: Point) -> Option<(ObjectId, Handle)> {
        let selected = self.object(self.selected?)?;
        self.handle_rects(selected)
            .into_iter()
            .find(|(_, r)| r.contains(p))
            .map(|(h, _)| (selected.id, h))
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn pointer_down(&mut self, p: Point) {
        if let Some((id, handle)) = self.handle_at(p) {
            if let Some(obj) = self.object(id) {
                self.gesture = Some(Gesture::Resize {
                    id,
                    handle,
                    start: p,
                    origin: obj.bounds(),
                    moved: false,
                });
            }
            return;
        }

        match self.hit_test(p) {
            Some(id) => {
                self.selected = Some(id);
                if let Some(obj) = self.object(id) {
                    self.gesture = Some(Gesture::Move {
                        id,
                        start: p,
                        origin: Point::new(obj.left, obj.top),
                        moved: false,
                    });
                }
            }
            None => {
                self.selected = None;
                self.gesture = None;
            }
        }
    }

    fn pointer_move(&mut self, p: Point) {
        let min = self.style.min_object_size;
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };

        match gesture {
            Gesture::Move {
                id,
                start,
                origin,
                moved,
            } => {
                let (dx, dy) = (p.x - start.x, p.y - start.y);
                if dx != 0.0 || dy != 0.0 {
                    *moved = true;
                }
                let (id, to) = (*id, Point::new(origin.x + dx, origin.y + dy));
                if let Some(obj) = self.object_mut(id) {
                    obj.left = to.x;
                    obj.top = to.y;
                }
            }
            Gesture::Resize {
                id,
                handle,
                start,
                origin,
                moved,
            } => {
                let (dx, dy) = (p.x - start.x, p.y - start.y);
                if dx != 0.0 || dy != 0.0 {
                    *moved = true;
                }
                let (id, next) = (*id, handle.resize(*origin, dx, dy, min));
                if let Some(obj) = self.object_mut(id) {
                    obj.left = next.x;
                    obj.top = next.y;
                    obj.scale_x = next.width / obj.width;
                    obj.scale_y = next.height / obj.height;
                }
            }
        }
    }

    fn pointer_up(&mut self, p: Point) {
        self.pointer_move(p);
        let committed = match self.gesture.take() {
            Some(Gesture::Move { id, moved: true, .. })
            | Some(Gesture::Resize { id, moved: true, .. }) => id,
            _ => return,
        };

        let Some(bounds) = self.object(committed).map(SceneObject::bounds) else {
            return;
        };
        let event = ObjectModified {
            object: committed,
            bounds,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl Scene for Surface {
    fn create_text_object(&mut self, style: TextStyle, at: Point) -> SceneObject {
        let size = measure_text(&style.content, style.font_size);
        SceneObject {
            id: self.alloc_id(),
            left: at.x,
            top: at.y,
            width: size.width,
            height: size.height,
            scale_x: 1.0,
            scale_y: 1.0,
            resizable: false,
            shape: Shape::Text(style),
        }
    }

    fn create_rect_object(
        &mut self,
        style: RectStyle,
        bounds: Rect,
        resizable: bool,
    ) -> SceneObject {
        let min = self.style.min_object_size;
        SceneObject {
            id: self.alloc_id(),
            left: bounds.x,
            top: bounds.y,
            width: bounds.width.max(min),
            height: bounds.height.max(min),
            scale_x: 1.0,
            scale_y: 1.0,
            resizable,
            shape: Shape::Rect(style),
        }
    }

    fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        if !self.disposed {
            self.objects.push(object);
        }
        id
    }

    fn remove_all_objects(&mut self) {
        self.objects.clear();
        self.selected = None;
        self.gesture = None;
    }

    fn set_canvas(&mut self, size: Size, has_background: bool) {
        if self.disposed {
            return;
        }
        self.canvas = size;
        self.has_background = has_background;
    }

    fn render(&self) -> Frame {
        let mut frame = Frame {
            canvas: self.canvas,
            commands: Vec::with_capacity(self.objects.len() + 10),
        };
        if self.disposed {
            return frame;
        }

        if self.has_background {
            frame.commands.push(DrawCommand::Background { size: self.canvas });
        }

        for obj in &self.objects {
            let bounds = obj.bounds();
            frame.commands.push(match &obj.shape {
                Shape::Rect(style) => DrawCommand::Rect {
                    bounds,
                    fill: style.fill,
                    stroke: style.stroke,
                    stroke_width: style.stroke_width,
                },
                Shape::Text(style) => DrawCommand::Text {
                    bounds,
                    content: style.content.clone(),
                    font_size: style.font_size,
                    font_family: style.font_family.clone(),
                    bold: style.bold,
                    fill: style.fill,
                    highlight: style.highlight,
                },
            });
        }

        if let Some(selected) = self.selected.and_then(|id| self.object(id)) {
            frame.commands.push(DrawCommand::SelectionOutline {
                bounds: selected.bounds(),
                color: self.style.selection_color,
            });
            for (_, bounds) in self.handle_rects(selected) {
                frame.commands.push(DrawCommand::Handle {
                    bounds,
                    color: self.style.handle_color,
                });
            }
        }

        frame
    }

    fn on_object_modified(&mut self, listener: ModifiedListener) {
        if !self.disposed {
            self.listeners.push(listener);
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        if self.disposed {
            return;
        }
        match event {
            PointerEvent::Down(p) => self.pointer_down(p),
            PointerEvent::Move(p) => self.pointer_move(p),
            PointerEvent::Up(p) => self.pointer_up(p),
        }
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn dispose(&mut self) {
        self.remove_all_objects();
        self.listeners.clear();
        self.canvas = Size::default();
        self.has_background = false;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rect_style() -> RectStyle {
        RectStyle {
            fill: Color::rgba(0, 0, 255, 80),
            stroke: Color::rgb(0, 0, 255),
            stroke_width: 1.0,
        }
    }

    fn text_style(content: &str) -> TextStyle {
        TextStyle {
            content: content.into(),
            font_size: 10.0,
            font_family: "Arial".into(),
            bold: false,
            fill: Color::BLACK,
            highlight: Color::rgba(255, 255, 0, 80),
        }
    }

    /// Surface with a 100x100 canvas and an event log.
    fn surface() -> (Surface, Rc<RefCell<Vec<ObjectModified>>>) {
        let mut s = Surface::default();
        s.set_canvas(Size::new(100.0, 100.0), true);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        s.on_object_modified(Box::new(move |e| sink.borrow_mut().push(*e)));
        (s, log)
    }

    fn drag(s: &mut Surface, from: Point, to: Point) {
        s.handle_pointer(PointerEvent::Down(from));
        s.handle_pointer(PointerEvent::Move(Point::new(
            (from.x + to.x) / 2.0,
            (from.y + to.y) / 2.0,
        )));
        s.handle_pointer(PointerEvent::Up(to));
    }

    #[test]
    fn drag_moves_and_emits_once() {
        let (mut s, log) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(10.0, 10.0, 20.0, 20.0), true);
        let id = s.add_object(obj);

        drag(&mut s, Point::new(15.0, 15.0), Point::new(35.0, 45.0));

        let events = log.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].object, id);
        assert_eq!(events[0].bounds, Rect::new(30.0, 40.0, 20.0, 20.0));
    }

    #[test]
    fn click_without_motion_selects_but_does_not_emit() {
        let (mut s, log) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(10.0, 10.0, 20.0, 20.0), true);
        let id = s.add_object(obj);

        s.handle_pointer(PointerEvent::Down(Point::new(12.0, 12.0)));
        s.handle_pointer(PointerEvent::Up(Point::new(12.0, 12.0)));

        assert_eq!(s.selected(), Some(id));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn topmost_object_wins_hit_test() {
        let (mut s, _) = surface();
        let a = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 50.0, 50.0), true);
        let a = s.add_object(a);
        let b = s.create_rect_object(rect_style(), Rect::new(25.0, 25.0, 50.0, 50.0), true);
        let b = s.add_object(b);

        assert_eq!(s.hit_test(Point::new(30.0, 30.0)), Some(b));
        assert_eq!(s.hit_test(Point::new(10.0, 10.0)), Some(a));
        assert_eq!(s.hit_test(Point::new(90.0, 5.0)), None);
    }

    #[test]
    fn click_on_empty_space_clears_selection() {
        let (mut s, _) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 10.0, 10.0), true);
        let id = s.add_object(obj);
        s.select(Some(id));
        s.handle_pointer(PointerEvent::Down(Point::new(80.0, 80.0)));
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn bottom_right_handle_resizes_and_reports_scaled_size() {
        let (mut s, log) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(10.0, 10.0, 20.0, 20.0), true);
        let id = s.add_object(obj);
        s.select(Some(id));

        drag(&mut s, Point::new(30.0, 30.0), Point::new(50.0, 40.0));

        let events = log.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].bounds, Rect::new(10.0, 10.0, 40.0, 30.0));
        let obj = s.object(id).unwrap();
        assert!((obj.scale_x - 2.0).abs() < 1e-9);
        assert!((obj.scale_y - 1.5).abs() < 1e-9);
        assert_eq!(obj.width, 20.0);
    }

    #[test]
    fn top_left_handle_keeps_opposite_corner() {
        let (mut s, log) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(10.0, 10.0, 20.0, 20.0), true);
        let id = s.add_object(obj);
        s.select(Some(id));

        drag(&mut s, Point::new(10.0, 10.0), Point::new(5.0, 0.0));

        assert_eq!(log.borrow()[0].bounds, Rect::new(5.0, 0.0, 25.0, 30.0));
    }

    #[test]
    fn resize_clamps_to_minimum_size() {
        let r = Handle::Right.resize(Rect::new(10.0, 10.0, 20.0, 20.0), -100.0, 0.0, 1.0);
        assert_eq!(r, Rect::new(10.0, 10.0, 1.0, 20.0));
        let l = Handle::Left.resize(Rect::new(10.0, 10.0, 20.0, 20.0), 100.0, 0.0, 1.0);
        assert_eq!(l, Rect::new(29.0, 10.0, 1.0, 20.0));
    }

    #[test]
    fn text_objects_have_no_handles() {
        let (mut s, log) = surface();
        let obj = s.create_text_object(text_style("Name"), Point::new(10.0, 10.0));
        assert!(!obj.resizable);
        let id = s.add_object(obj);
        s.select(Some(id));

        assert!(s.handle_rects(s.object(id).unwrap()).is_empty());
        let frame = s.render();
        assert!(frame.commands.iter().any(|c| matches!(c, DrawCommand::SelectionOutline { .. })));
        assert!(!frame.commands.iter().any(|c| matches!(c, DrawCommand::Handle { .. })));

        // Dragging from the bottom-right corner moves instead of resizing
        let b = s.object(id).unwrap().bounds();
        drag(&mut s, Point::new(b.right(), b.bottom()), Point::new(b.right() + 5.0, b.bottom()));
        let moved = log.borrow()[0].bounds;
        assert!((moved.x - 15.0).abs() < 1e-9);
        assert!((moved.width - b.width).abs() < 1e-9);
    }

    #[test]
    fn render_lists_background_objects_and_handles() {
        let (mut s, _) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 10.0, 10.0), true);
        let id = s.add_object(obj);
        let txt = s.create_text_object(text_style(""), Point::new(20.0, 20.0));
        s.add_object(txt);
        s.select(Some(id));

        let frame = s.render();
        assert!(matches!(frame.commands[0], DrawCommand::Background { .. }));
        assert_eq!(frame.object_count(), 2);
        let handles = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Handle { .. }))
            .count();
        assert_eq!(handles, 8);
    }

    #[test]
    fn remove_all_objects_cancels_gesture() {
        let (mut s, log) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 10.0, 10.0), true);
        s.add_object(obj);
        s.handle_pointer(PointerEvent::Down(Point::new(5.0, 5.0)));
        s.handle_pointer(PointerEvent::Move(Point::new(8.0, 8.0)));
        s.remove_all_objects();
        s.handle_pointer(PointerEvent::Up(Point::new(9.0, 9.0)));
        assert!(log.borrow().is_empty());
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn ids_stay_unique_across_rebuilds() {
        let (mut s, _) = surface();
        let a = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 1.0, 1.0), true);
        let a = s.add_object(a);
        s.remove_all_objects();
        let b = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 1.0, 1.0), true);
        let b = s.add_object(b);
        assert_ne!(a, b);
    }

    #[test]
    fn disposed_surface_ignores_everything() {
        let (mut s, log) = surface();
        let obj = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 10.0, 10.0), true);
        s.add_object(obj);
        s.dispose();

        assert!(s.is_disposed());
        assert_eq!(s.object_count(), 0);
        let obj = s.create_rect_object(rect_style(), Rect::new(0.0, 0.0, 10.0, 10.0), true);
        s.add_object(obj);
        assert_eq!(s.object_count(), 0);
        drag(&mut s, Point::new(5.0, 5.0), Point::new(9.0, 9.0));
        assert!(log.borrow().is_empty());
        assert!(s.render().commands.is_empty());
    }
}
