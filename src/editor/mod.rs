//! # Layout Editor
//!
//! Positions text and image-placeholder fields over a template background.
//!
//! The editor owns no persisted state. The host hands it a [`Template`] and a
//! container size; the editor fits the background into the container, builds
//! one scene object per item, and after every committed drag or resize calls
//! `on_layout_update` with the complete replacement item list in image space.
//!
//! ## Generations
//!
//! Every rebuild request (new template, container resize, dispose) bumps a
//! generation counter. Background loads are handed out as [`LoadRequest`]s that
//! capture the generation they were issued under; a completion carrying an
//! older generation, or arriving after dispose, is a no-op. The image decode
//! itself is never cancelled.
//!
//! ## Example
//!
//! ```
//! use stencil::background::StaticImageSource;
//! use stencil::editor::{LayoutEditor, LoadOutcome};
//! use stencil::geometry::{Point, Size};
//! use stencil::template::{LayoutItem, Template};
//!
//! let source = StaticImageSource::new().with(
//!     "bg.png",
//!     image::DynamicImage::new_rgba8(1600, 1200),
//! );
//! let mut editor = LayoutEditor::with_surface(Size::new(800.0, 600.0), |items| {
//!     println!("{} items updated", items.len());
//! });
//!
//! let template = Template::new("t1", "bg.png")
//!     .item(LayoutItem::image("photo", 100.0, 100.0, 200.0, 200.0));
//! let request = editor.set_template(template)?.expect("background not cached yet");
//! let outcome = editor.complete_load(&request, source.get(&request.url));
//! assert_eq!(outcome, LoadOutcome::Applied);
//!
//! // Drag the placeholder 10 canvas pixels right: 20 image pixels at scale 0.5.
//! editor.pointer_down(Point::new(60.0, 60.0));
//! editor.pointer_up(Point::new(70.0, 60.0));
//! assert_eq!(editor.items()[0].x, 120.0);
//! # Ok::<(), stencil::StencilError>(())
//! ```

mod build;
mod propagate;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::background::DecodedBackground;
use crate::error::StencilError;
use crate::geometry::{Fit, Point, Size, fit_within};
use crate::scene::{
    Color, Frame, ObjectId, ObjectModified, PointerEvent, Scene, Surface, SurfaceStyle,
};
use crate::template::{ItemKind, LayoutItem, Template};

/// Receives the full replacement item list after each committed edit.
///
/// Called synchronously from inside the editor; it must not call back into
/// the same editor.
pub type LayoutCallback = Box<dyn FnMut(Vec<LayoutItem>)>;

/// Styling of the objects the editor creates.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub text_highlight: Color,
    pub placeholder_fill: Color,
    pub placeholder_stroke: Color,
    pub placeholder_stroke_width: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            text_highlight: Color::rgb(255, 255, 0).with_opacity(0.3),
            placeholder_fill: Color::rgb(0, 0, 255).with_opacity(0.2),
            placeholder_stroke: Color::rgb(0, 0, 255),
            placeholder_stroke_width: 1.0,
        }
    }
}

/// Which layout item a scene object stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub item_id: String,
    pub kind: ItemKind,
}

/// State of the background image for the current template.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundStatus {
    /// No template, or a template without a background URL.
    Empty,
    Loading { url: String },
    Ready { url: String, size: Size },
    /// The last load failed. The previous scene is still shown.
    Failed { url: String, reason: String },
}

/// A background load the host must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub url: String,
}

/// What a completed load did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Background stored and scene rebuilt.
    Applied,
    /// Load failed; scene left untouched.
    Failed,
    /// A newer build request superseded this load.
    Stale,
    /// The editor was disposed before the load finished.
    Disposed,
}

pub struct LayoutEditor<S: Scene = Surface> {
    scene: S,
    config: EditorConfig,
    template: Option<Template>,
    /// Working copy of the items; replaced by each template and each commit.
    items: Vec<LayoutItem>,
    container: Size,
    background: Option<DecodedBackground>,
    status: BackgroundStatus,
    fit: Option<Fit>,
    bindings: HashMap<ObjectId, Binding>,
    generation: u64,
    scene_generation: Option<u64>,
    inbox: Rc<RefCell<Vec<ObjectModified>>>,
    on_layout_update: LayoutCallback,
    disposed: bool,
}

impl LayoutEditor<Surface> {
    /// Editor on the built-in [`Surface`] with default styling.
    pub fn with_surface(
        container: Size,
        on_layout_update: impl FnMut(Vec<LayoutItem>) + 'static,
    ) -> Self {
        Self::new(
            Surface::new(SurfaceStyle::default()),
            EditorConfig::default(),
            container,
            on_layout_update,
        )
    }
}

impl<S: Scene> LayoutEditor<S> {
    pub fn new(
        mut scene: S,
        config: EditorConfig,
        container: Size,
        on_layout_update: impl FnMut(Vec<LayoutItem>) + 'static,
    ) -> Self {
        let inbox = Rc::new(RefCell::new(Vec::new()));
        let sink = inbox.clone();
        scene.on_object_modified(Box::new(move |event: &ObjectModified| {
            sink.borrow_mut().push(*event)
        }));

        Self {
            scene,
            config,
            template: None,
            items: Vec::new(),
            container,
            background: None,
            status: BackgroundStatus::Empty,
            fit: None,
            bindings: HashMap::new(),
            generation: 0,
            scene_generation: None,
            inbox,
            on_layout_update: Box::new(on_layout_update),
            disposed: false,
        }
    }

    // --- Inputs ---

    /// Adopt a new template and rebuild from it.
    ///
    /// If the background for its URL is already decoded the scene is rebuilt
    /// immediately and `None` is returned; otherwise the returned request must
    /// be fetched and passed to [`complete_load`](Self::complete_load). An
    /// invalid template is rejected and the current state kept.
    pub fn set_template(
        &mut self,
        template: Template,
    ) -> Result<Option<LoadRequest>, StencilError> {
        if self.disposed {
            tracing::debug!(template = %template.id, "template update after dispose ignored");
            return Ok(None);
        }
        template.validate()?;

        self.generation += 1;
        self.items = template.items.clone();
        self.template = Some(template);
        Ok(self.refresh())
    }

    /// Container resize notification.
    pub fn resize(&mut self, container: Size) -> Option<LoadRequest> {
        if self.disposed || container == self.container {
            return None;
        }
        self.container = container;
        self.generation += 1;
        if self.template.is_none() {
            return None;
        }
        self.refresh()
    }

    /// Report the result of a load issued by this editor.
    pub fn complete_load(
        &mut self,
        request: &LoadRequest,
        result: Result<DecodedBackground, StencilError>,
    ) -> LoadOutcome {
        if self.disposed {
            tracing::debug!(url = %request.url, "background load finished after dispose");
            return LoadOutcome::Disposed;
        }
        if request.generation != self.generation {
            tracing::debug!(
                url = %request.url,
                issued = request.generation,
                current = self.generation,
                "stale background load dropped"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(background) => {
                self.status = BackgroundStatus::Ready {
                    url: request.url.clone(),
                    size: background.size(),
                };
                self.background = Some(background);
                self.rebuild();
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "background load failed");
                self.status = BackgroundStatus::Failed {
                    url: request.url.clone(),
                    reason: e.to_string(),
                };
                LoadOutcome::Failed
            }
        }
    }

    /// Re-issue the load after a failure. `None` unless the status is `Failed`.
    pub fn retry_background(&mut self) -> Option<LoadRequest> {
        if self.disposed {
            return None;
        }
        let BackgroundStatus::Failed { url, .. } = &self.status else {
            return None;
        };
        let url = url.clone();
        self.status = BackgroundStatus::Loading { url: url.clone() };
        Some(LoadRequest {
            generation: self.generation,
            url,
        })
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        if self.disposed {
            return;
        }
        self.scene.handle_pointer(event);
        self.drain_modified();
    }

    pub fn pointer_down(&mut self, p: Point) {
        self.pointer(PointerEvent::Down(p));
    }

    pub fn pointer_move(&mut self, p: Point) {
        self.pointer(PointerEvent::Move(p));
    }

    pub fn pointer_up(&mut self, p: Point) {
        self.pointer(PointerEvent::Up(p));
    }

    /// Apply a transform commit directly, as if the scene had reported it.
    pub fn commit(&mut self, event: ObjectModified) {
        if self.disposed {
            return;
        }
        self.handle_modified(event);
    }

    /// Release the scene. Later inputs and load completions are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.generation += 1;
        self.scene.dispose();
        self.bindings.clear();
        self.inbox.borrow_mut().clear();
        tracing::debug!("layout editor disposed");
    }

    // --- Queries ---

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Current items, including edits not yet round-tripped by the host.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn status(&self) -> &BackgroundStatus {
        &self.status
    }

    pub fn background(&self) -> Option<&DecodedBackground> {
        self.background.as_ref()
    }

    pub fn fit(&self) -> Option<Fit> {
        self.fit
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation the current scene objects were built under.
    pub fn scene_generation(&self) -> Option<u64> {
        self.scene_generation
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn render(&self) -> Frame {
        self.scene.render()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn binding(&self, object: ObjectId) -> Option<&Binding> {
        self.bindings.get(&object)
    }

    /// Scene object currently standing for `item_id`.
    pub fn object_for_item(&self, item_id: &str) -> Option<ObjectId> {
        self.bindings
            .iter()
            .find(|(_, b)| b.item_id == item_id)
            .map(|(id, _)| *id)
    }

    // --- Internals ---

    /// Rebuild now if the background is at hand, else ask for a load.
    fn refresh(&mut self) -> Option<LoadRequest> {
        let url = self
            .template
            .as_ref()
            .map(|t| t.background_image_url.clone())
            .unwrap_or_default();

        if url.is_empty() {
            self.status = BackgroundStatus::Empty;
            self.background = None;
            self.rebuild_empty();
            return None;
        }

        if self.background.as_ref().is_some_and(|bg| bg.url() == url) {
            self.rebuild();
            return None;
        }

        self.status = BackgroundStatus::Loading { url: url.clone() };
        Some(LoadRequest {
            generation: self.generation,
            url,
        })
    }

    fn rebuild(&mut self) {
        let Some(background) = &self.background else {
            return;
        };
        self.fit = fit_within(background.size(), self.container);
        if self.fit.is_none() {
            tracing::debug!(container = ?self.container, "no usable fit, scene left empty");
        }
        self.bindings = build::build_scene(&mut self.scene, &self.items, self.fit, &self.config);
        self.inbox.borrow_mut().clear();
        self.scene_generation = Some(self.generation);
        tracing::info!(
            generation = self.generation,
            objects = self.bindings.len(),
            scale = self.fit.map(|f| f.scale),
            "scene rebuilt"
        );
    }

    fn rebuild_empty(&mut self) {
        self.fit = None;
        self.bindings = build::build_scene(&mut self.scene, &self.items, None, &self.config);
        self.inbox.borrow_mut().clear();
        self.scene_generation = Some(self.generation);
    }

    fn drain_modified(&mut self) {
        let events = std::mem::take(&mut *self.inbox.borrow_mut());
        for event in events {
            self.handle_modified(event);
        }
    }

    fn handle_modified(&mut self, event: ObjectModified) {
        // The scene on screen may still belong to a template whose load is pending.
        if self.scene_generation != Some(self.generation) {
            tracing::debug!(
                object = event.object.as_u64(),
                scene = ?self.scene_generation,
                current = self.generation,
                "commit on an outdated scene ignored"
            );
            return;
        }
        let Some(binding) = self.bindings.get(&event.object) else {
            tracing::debug!(object = event.object.as_u64(), "modified object has no binding");
            return;
        };
        let Some(fit) = self.fit else {
            return;
        };
        let Some(items) = propagate::apply_commit(&self.items, binding, event.bounds, &fit) else {
            tracing::debug!(item = %binding.item_id, "bound item no longer in template");
            return;
        };

        tracing::debug!(item = %binding.item_id, "layout item committed");
        self.items = items.clone();
        (self.on_layout_update)(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::StaticImageSource;
    use crate::geometry::Rect;
    use image::DynamicImage;
    use pretty_assertions::assert_eq;

    const BG: &str = "https://cdn.example/bg.png";

    fn source() -> StaticImageSource {
        StaticImageSource::new()
            .with(BG, DynamicImage::new_rgba8(1600, 1200))
            .with("https://cdn.example/wide.png", DynamicImage::new_rgba8(400, 100))
    }

    type Updates = Rc<RefCell<Vec<Vec<LayoutItem>>>>;

    fn editor(container: Size) -> (LayoutEditor, Updates) {
        let updates: Updates = Rc::new(RefCell::new(Vec::new()));
        let sink = updates.clone();
        let editor =
            LayoutEditor::with_surface(container, move |items| sink.borrow_mut().push(items));
        (editor, updates)
    }

    fn template() -> Template {
        Template::new("t1", BG)
            .name("Certificate")
            .item(LayoutItem::text("f1", "Name", 10.0, 20.0).font_size(14.0))
            .item(LayoutItem::image("photo", 200.0, 400.0, 100.0, 120.0))
    }

    /// Set the template and complete its load from the static source.
    fn load(editor: &mut LayoutEditor, template: Template) {
        if let Some(req) = editor.set_template(template).unwrap() {
            let outcome = editor.complete_load(&req, source().get(&req.url));
            assert_eq!(outcome, LoadOutcome::Applied);
        }
    }

    fn drag(editor: &mut LayoutEditor, from: Point, to: Point) {
        editor.pointer_down(from);
        editor.pointer_move(Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0));
        editor.pointer_up(to);
    }

    #[test]
    fn matching_aspect_renders_text_at_half_scale() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());

        let fit = ed.fit().unwrap();
        assert_eq!(fit.canvas, Size::new(800.0, 600.0));
        assert_eq!(fit.scale, 0.5);

        let id = ed.object_for_item("f1").unwrap();
        let obj = ed.scene().object(id).unwrap();
        assert_eq!((obj.left, obj.top), (5.0, 10.0));
    }

    #[test]
    fn nothing_built_until_background_arrives() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        let req = ed.set_template(template()).unwrap().unwrap();
        assert_eq!(req.url, BG);
        assert_eq!(ed.status(), &BackgroundStatus::Loading { url: BG.into() });
        assert_eq!(ed.scene().object_count(), 0);
    }

    #[test]
    fn dragging_placeholder_reports_full_list_once() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        let before = ed.items().to_vec();

        // Placeholder sits at canvas (100, 200), 50x60
        drag(&mut ed, Point::new(110.0, 210.0), Point::new(130.0, 260.0));

        let updates = updates.borrow();
        assert_eq!(updates.len(), 1);
        let after = &updates[0];
        assert_eq!(after.len(), before.len());
        let ids: Vec<_> = after.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "photo"]);

        assert_eq!(after[0], before[0]);
        assert_eq!(after[1].x, 240.0);
        assert_eq!(after[1].y, 500.0);
        assert_eq!(after[1].width, Some(100.0));
        assert_eq!(after[1].height, Some(120.0));
        assert_eq!(after[1].label, before[1].label);
    }

    #[test]
    fn resizing_placeholder_reports_image_space_size() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());

        // Select, then pull the bottom-right handle at canvas (150, 260)
        ed.pointer_down(Point::new(120.0, 220.0));
        ed.pointer_up(Point::new(120.0, 220.0));
        assert!(updates.borrow().is_empty());
        drag(&mut ed, Point::new(150.0, 260.0), Point::new(175.0, 290.0));

        let updates = updates.borrow();
        assert_eq!(updates.len(), 1);
        let photo = &updates[0][1];
        assert_eq!((photo.x, photo.y), (200.0, 400.0));
        assert_eq!(photo.width, Some(150.0));
        assert_eq!(photo.height, Some(180.0));
    }

    #[test]
    fn moving_text_leaves_other_items_untouched() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());

        drag(&mut ed, Point::new(7.0, 12.0), Point::new(57.0, 22.0));

        let updates = updates.borrow();
        assert_eq!(updates.len(), 1);
        let text = &updates[0][0];
        assert_eq!((text.x, text.y), (110.0, 40.0));
        assert_eq!(text.width, None);
        assert_eq!(updates[0][1], template().items[1]);
    }

    #[test]
    fn consecutive_commits_accumulate() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());

        drag(&mut ed, Point::new(7.0, 12.0), Point::new(17.0, 12.0));
        drag(&mut ed, Point::new(110.0, 210.0), Point::new(120.0, 210.0));

        let updates = updates.borrow();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1][0].x, 30.0);
        assert_eq!(updates[1][1].x, 220.0);
    }

    #[test]
    fn resize_rebuilds_proportionally() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        let gen_before = ed.scene_generation();

        assert_eq!(ed.resize(Size::new(400.0, 600.0)), None);

        assert_ne!(ed.scene_generation(), gen_before);
        let fit = ed.fit().unwrap();
        assert_eq!(fit.canvas, Size::new(400.0, 300.0));
        assert_eq!(ed.scene().object_count(), 2);
        let photo = ed.scene().object(ed.object_for_item("photo").unwrap()).unwrap();
        assert_eq!(photo.bounds(), Rect::new(50.0, 100.0, 25.0, 30.0));
    }

    #[test]
    fn same_size_resize_is_ignored() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        let generation = ed.generation();
        ed.resize(Size::new(800.0, 600.0));
        assert_eq!(ed.generation(), generation);
    }

    #[test]
    fn stale_load_is_dropped() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        let first = ed.set_template(template()).unwrap().unwrap();
        let second = ed.resize(Size::new(400.0, 300.0)).unwrap();
        assert!(second.generation > first.generation);

        assert_eq!(ed.complete_load(&first, source().get(BG)), LoadOutcome::Stale);
        assert_eq!(ed.scene().object_count(), 0);
        assert_eq!(ed.complete_load(&second, source().get(BG)), LoadOutcome::Applied);
        assert_eq!(ed.scene().object_count(), 2);
    }

    #[test]
    fn failed_load_keeps_previous_scene() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        let frame_before = ed.render();

        let mut next = template();
        next.background_image_url = "https://cdn.example/missing.png".into();
        let req = ed.set_template(next).unwrap().unwrap();
        let outcome = ed.complete_load(&req, source().get(&req.url));

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(matches!(ed.status(), BackgroundStatus::Failed { .. }));
        assert_eq!(ed.render(), frame_before);

        let retry = ed.retry_background().unwrap();
        assert_eq!(retry.url, "https://cdn.example/missing.png");
        assert_eq!(ed.status(), &BackgroundStatus::Loading { url: retry.url.clone() });
    }

    #[test]
    fn retry_only_after_failure() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        assert_eq!(ed.retry_background(), None);
    }

    #[test]
    fn new_template_with_same_background_rebuilds_without_load() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());

        let next = template().item(LayoutItem::text("f2", "Date", 0.0, 0.0));
        assert_eq!(ed.set_template(next).unwrap(), None);
        assert_eq!(ed.scene().object_count(), 3);
    }

    #[test]
    fn rebuild_mid_drag_drops_the_gesture() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());

        ed.pointer_down(Point::new(110.0, 210.0));
        ed.pointer_move(Point::new(150.0, 250.0));
        ed.set_template(template()).unwrap();
        ed.pointer_up(Point::new(160.0, 260.0));

        assert!(updates.borrow().is_empty());
        let photo = ed.scene().object(ed.object_for_item("photo").unwrap()).unwrap();
        assert_eq!((photo.left, photo.top), (100.0, 200.0));
    }

    #[test]
    fn edits_on_the_previous_scene_are_ignored_while_loading() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());

        let mut next = template();
        next.background_image_url = "https://cdn.example/wide.png".into();
        let req = ed.set_template(next).unwrap().unwrap();
        assert_ne!(ed.scene_generation(), Some(ed.generation()));

        drag(&mut ed, Point::new(110.0, 210.0), Point::new(130.0, 260.0));
        assert!(updates.borrow().is_empty());
        assert_eq!(ed.items()[1], template().items[1]);

        assert_eq!(
            ed.complete_load(&req, source().get(&req.url)),
            LoadOutcome::Applied
        );
        assert_eq!(ed.scene_generation(), Some(ed.generation()));
        let photo = ed.object_for_item("photo").unwrap();
        let bounds = ed.scene().object(photo).unwrap().bounds();
        ed.commit(ObjectModified {
            object: photo,
            bounds: Rect::new(bounds.x + 5.0, bounds.y, bounds.width, bounds.height),
        });
        assert_eq!(updates.borrow().len(), 1);
    }

    #[test]
    fn empty_url_clears_scene() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        let mut blank = template();
        blank.background_image_url.clear();
        assert_eq!(ed.set_template(blank).unwrap(), None);
        assert_eq!(ed.status(), &BackgroundStatus::Empty);
        assert_eq!(ed.scene().object_count(), 0);
    }

    #[test]
    fn invalid_template_keeps_state() {
        let (mut ed, _) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        let bad = template().item(LayoutItem::text("f1", "dup", 0.0, 0.0));
        assert!(ed.set_template(bad).is_err());
        assert_eq!(ed.items().len(), 2);
        assert_eq!(ed.scene().object_count(), 2);
    }

    #[test]
    fn commit_on_unbound_object_is_ignored() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        load(&mut ed, template());
        ed.commit(ObjectModified {
            object: ObjectId(9999),
            bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
        });
        assert!(updates.borrow().is_empty());
    }

    #[test]
    fn dispose_turns_everything_into_no_ops() {
        let (mut ed, updates) = editor(Size::new(800.0, 600.0));
        let req = ed.set_template(template()).unwrap().unwrap();
        ed.dispose();

        assert_eq!(ed.complete_load(&req, source().get(BG)), LoadOutcome::Disposed);
        assert_eq!(ed.resize(Size::new(10.0, 10.0)), None);
        assert_eq!(ed.set_template(template()).unwrap(), None);
        drag(&mut ed, Point::new(110.0, 210.0), Point::new(130.0, 260.0));
        assert!(updates.borrow().is_empty());
        assert_eq!(ed.scene().object_count(), 0);
    }

    #[test]
    fn wide_image_in_square_container_letterboxes() {
        let (mut ed, _) = editor(Size::new(500.0, 500.0));
        let t = Template::new("t2", "https://cdn.example/wide.png")
            .item(LayoutItem::text("a", "A", 400.0, 100.0));
        load(&mut ed, t);
        let fit = ed.fit().unwrap();
        assert_eq!(fit.canvas, Size::new(500.0, 125.0));
        let obj = ed.scene().object(ed.object_for_item("a").unwrap()).unwrap();
        assert_eq!((obj.left, obj.top), (500.0, 125.0));
    }
}
