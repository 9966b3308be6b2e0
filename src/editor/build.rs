//! Scene building: materialize layout items as scene objects.

use std::collections::HashMap;

use super::{Binding, EditorConfig};
use crate::geometry::{Fit, Size};
use crate::scene::{Color, ObjectId, RectStyle, Scene, TextStyle};
use crate::template::{FontWeight, ItemKind, LayoutItem};

/// Discard every object in `scene` and rebuild one object per item.
///
/// Returns the side table from new object ids to the items they stand for.
/// With no fit (no background yet, or an empty container) the scene is left
/// empty with a zero-size canvas.
pub(super) fn build_scene<S: Scene>(
    scene: &mut S,
    items: &[LayoutItem],
    fit: Option<Fit>,
    config: &EditorConfig,
) -> HashMap<ObjectId, Binding> {
    scene.remove_all_objects();

    let Some(fit) = fit else {
        scene.set_canvas(Size::default(), false);
        return HashMap::new();
    };

    scene.set_canvas(fit.canvas, true);

    items
        .iter()
        .map(|item| {
            let id = materialize(scene, item, &fit, config);
            (
                id,
                Binding {
                    item_id: item.id.clone(),
                    kind: item.kind,
                },
            )
        })
        .collect()
}

/// Create and add the scene object for one item.
fn materialize<S: Scene>(
    scene: &mut S,
    item: &LayoutItem,
    fit: &Fit,
    config: &EditorConfig,
) -> ObjectId {
    let object = match item.kind {
        ItemKind::Text => scene.create_text_object(
            TextStyle {
                content: item.label.clone(),
                font_size: item.font_size,
                font_family: item.font_family.clone(),
                bold: item.font_weight == FontWeight::Bold,
                fill: Color::parse_or_black(&item.color),
                highlight: config.text_highlight,
            },
            fit.point_to_canvas(item.position()),
        ),
        ItemKind::ImagePlaceholder => scene.create_rect_object(
            RectStyle {
                fill: config.placeholder_fill,
                stroke: config.placeholder_stroke,
                stroke_width: config.placeholder_stroke_width,
            },
            fit.rect_to_canvas(item.placeholder_bounds()),
            item.kind.is_resizable(),
        ),
    };
    scene.add_object(object)
}
