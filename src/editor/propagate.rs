//! Change propagation: turn a committed canvas transform into a replacement
//! item list in image space.

use super::Binding;
use crate::geometry::{Fit, Rect};
use crate::template::{ItemKind, LayoutItem};

/// Replace the geometry of the item `binding` points at.
///
/// `bounds` is the object's canvas geometry at commit time. Position always
/// updates; width/height update only for image placeholders. Every other item
/// passes through unchanged and order is preserved. Returns `None` if no item
/// carries the bound id.
pub(super) fn apply_commit(
    items: &[LayoutItem],
    binding: &Binding,
    bounds: Rect,
    fit: &Fit,
) -> Option<Vec<LayoutItem>> {
    if !items.iter().any(|i| i.id == binding.item_id) {
        return None;
    }

    let image = fit.rect_to_image(bounds);
    Some(
        items
            .iter()
            .map(|item| {
                if item.id != binding.item_id {
                    return item.clone();
                }
                let mut updated = item.clone();
                updated.x = image.x;
                updated.y = image.y;
                if binding.kind == ItemKind::ImagePlaceholder {
                    updated.width = Some(image.width);
                    updated.height = Some(image.height);
                }
                updated
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Size, fit_within};
    use pretty_assertions::assert_eq;

    fn fit() -> Fit {
        fit_within(Size::new(1600.0, 1200.0), Size::new(800.0, 600.0)).unwrap()
    }

    fn items() -> Vec<LayoutItem> {
        vec![
            LayoutItem::text("t", "Name", 10.0, 20.0),
            LayoutItem::image("p", 100.0, 100.0, 50.0, 60.0),
        ]
    }

    #[test]
    fn placeholder_commit_updates_position_and_size() {
        let binding = Binding {
            item_id: "p".into(),
            kind: ItemKind::ImagePlaceholder,
        };
        let bounds = Rect::new(60.0, 70.0, 40.0, 35.0);
        let out = apply_commit(&items(), &binding, bounds, &fit()).unwrap();

        let mut expected = items();
        expected[1].x = 120.0;
        expected[1].y = 140.0;
        expected[1].width = Some(80.0);
        expected[1].height = Some(70.0);
        assert_eq!(out, expected);
    }

    #[test]
    fn text_commit_ignores_size() {
        let binding = Binding {
            item_id: "t".into(),
            kind: ItemKind::Text,
        };
        let bounds = Rect::new(1.0, 2.0, 999.0, 999.0);
        let out = apply_commit(&items(), &binding, bounds, &fit()).unwrap();
        assert_eq!(out[0].x, 2.0);
        assert_eq!(out[0].y, 4.0);
        assert_eq!(out[0].width, None);
        assert_eq!(out[0].height, None);
        assert_eq!(out[1], items()[1]);
    }

    #[test]
    fn unknown_item_yields_none() {
        let binding = Binding {
            item_id: "gone".into(),
            kind: ItemKind::Text,
        };
        assert!(apply_commit(&items(), &binding, Rect::default(), &fit()).is_none());
    }
}
