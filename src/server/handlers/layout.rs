//! Layout API handlers: preview, fit and commit.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::background::{DecodedBackground, ImageSource};
use crate::editor::LayoutEditor;
use crate::error::StencilError;
use crate::geometry::{Fit, Rect, Size, fit_within};
use crate::preview::{self, MAX_PREVIEW_SIDE};
use crate::scene::{ObjectModified, Scene};
use crate::template::{LayoutItem, Template};

use super::super::state::AppState;

type ApiError = (StatusCode, String);

/// Request body for layout preview.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub template: Template,
    pub container: Size,
}

/// Request body for fit computation.
#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub image: Size,
    pub container: Size,
}

/// One canvas-space transform to commit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub item_id: String,
    pub x: f64,
    pub y: f64,
    /// Omitted width/height keep the object's current size.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Request body for commit.
#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub template: Template,
    pub container: Size,
    #[serde(default)]
    pub moves: Vec<Move>,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub items: Vec<LayoutItem>,
    pub fit: Fit,
}

/// POST /api/layout/preview - render the template's scene as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    check_preview_container(req.container)?;
    let background = fetch_background(&state, &req.template).await?;
    let png = render_preview(req.template, req.container, background).map_err(internal)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// POST /api/layout/fit - compute the fit of an image inside a container.
pub async fn fit(Json(req): Json<FitRequest>) -> Result<Json<Fit>, ApiError> {
    fit_within(req.image, req.container).map(Json).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "image and container must have positive size".to_string(),
        )
    })
}

/// POST /api/layout/commit - apply canvas-space moves, return image-space items.
pub async fn commit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, ApiError> {
    for m in &req.moves {
        check_move(m)?;
    }
    let background = fetch_background(&state, &req.template).await?;
    apply_moves(req.template, req.container, background, &req.moves).map(Json)
}

async fn fetch_background(
    state: &AppState,
    template: &Template,
) -> Result<DecodedBackground, ApiError> {
    if template.background_image_url.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "template has no backgroundImageUrl".to_string(),
        ));
    }
    state
        .backgrounds
        .fetch(&template.background_image_url)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))
}

/// The canvas never exceeds the container, so bounding the container bounds
/// the raster.
fn check_preview_container(container: Size) -> Result<(), ApiError> {
    let limit = MAX_PREVIEW_SIDE as f64;
    if container.width <= limit && container.height <= limit {
        return Ok(());
    }
    Err((
        StatusCode::BAD_REQUEST,
        format!(
            "container {}x{} exceeds the {}px preview limit",
            container.width, container.height, MAX_PREVIEW_SIDE
        ),
    ))
}

/// Positions must be finite and explicit sizes finite and positive.
fn check_move(m: &Move) -> Result<(), ApiError> {
    let invalid = |what: String| {
        Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("move for '{}': {}", m.item_id, what),
        ))
    };
    if !m.x.is_finite() || !m.y.is_finite() {
        return invalid("position must be finite".to_string());
    }
    for (name, value) in [("width", m.width), ("height", m.height)] {
        if let Some(v) = value
            && !(v.is_finite() && v > 0.0)
        {
            return invalid(format!("{} must be positive, got {}", name, v));
        }
    }
    Ok(())
}

fn internal(e: StencilError) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// An editor with `template` built over an already decoded background.
fn open_editor(
    template: Template,
    container: Size,
    background: DecodedBackground,
) -> Result<LayoutEditor, StencilError> {
    let mut editor = LayoutEditor::with_surface(container, |_| {});
    if let Some(request) = editor.set_template(template)? {
        editor.complete_load(&request, Ok(background));
    }
    Ok(editor)
}

fn render_preview(
    template: Template,
    container: Size,
    background: DecodedBackground,
) -> Result<Vec<u8>, StencilError> {
    let editor = open_editor(template, container, background)?;
    preview::render_png(&editor.render(), editor.background().map(|b| b.image()))
}

fn apply_moves(
    template: Template,
    container: Size,
    background: DecodedBackground,
    moves: &[Move],
) -> Result<CommitResponse, ApiError> {
    let mut editor = open_editor(template, container, background)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let fit = editor.fit().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "container must have positive size".to_string(),
        )
    })?;

    for m in moves {
        let object = editor.object_for_item(&m.item_id).ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("no item with id '{}'", m.item_id),
            )
        })?;
        let current = editor
            .scene()
            .object(object)
            .map(|o| o.bounds())
            .unwrap_or_default();
        editor.commit(ObjectModified {
            object,
            bounds: Rect::new(
                m.x,
                m.y,
                m.width.unwrap_or(current.width),
                m.height.unwrap_or(current.height),
            ),
        });
    }

    Ok(CommitResponse {
        items: editor.items().to_vec(),
        fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::StaticImageSource;
    use image::DynamicImage;

    const BG: &str = "https://cdn.example/bg.png";

    fn state() -> Arc<AppState> {
        let source = StaticImageSource::new().with(BG, DynamicImage::new_rgba8(1600, 1200));
        Arc::new(AppState::new(Arc::new(source)))
    }

    fn template() -> Template {
        Template::new("t1", BG)
            .item(LayoutItem::text("name", "Name", 10.0, 20.0))
            .item(LayoutItem::image("photo", 100.0, 100.0, 40.0, 40.0))
    }

    #[tokio::test]
    async fn commit_converts_to_image_space() {
        let req = CommitRequest {
            template: template(),
            container: Size::new(800.0, 600.0),
            moves: vec![
                Move {
                    item_id: "photo".into(),
                    x: 200.0,
                    y: 150.0,
                    width: Some(100.0),
                    height: None,
                },
                Move {
                    item_id: "name".into(),
                    x: 30.0,
                    y: 40.0,
                    width: Some(500.0),
                    height: Some(500.0),
                },
            ],
        };
        let Json(resp) = commit(State(state()), Json(req)).await.unwrap();

        assert_eq!(resp.fit.scale, 0.5);
        assert_eq!((resp.items[0].x, resp.items[0].y), (60.0, 80.0));
        assert_eq!(resp.items[0].width, None);
        let photo = &resp.items[1];
        assert_eq!((photo.x, photo.y), (400.0, 300.0));
        assert_eq!(photo.width, Some(200.0));
        assert_eq!(photo.height, Some(40.0));
    }

    #[tokio::test]
    async fn commit_unknown_item_is_unprocessable() {
        let req = CommitRequest {
            template: template(),
            container: Size::new(800.0, 600.0),
            moves: vec![Move {
                item_id: "nope".into(),
                x: 0.0,
                y: 0.0,
                width: None,
                height: None,
            }],
        };
        let err = commit(State(state()), Json(req)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_background_is_bad_gateway() {
        let mut t = template();
        t.background_image_url = "https://cdn.example/other.png".into();
        let req = CommitRequest {
            template: t,
            container: Size::new(800.0, 600.0),
            moves: vec![],
        };
        let err = commit(State(state()), Json(req)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn commit_rejects_non_positive_sizes() {
        let bad = |width, height| CommitRequest {
            template: template(),
            container: Size::new(800.0, 600.0),
            moves: vec![Move {
                item_id: "photo".into(),
                x: 10.0,
                y: 10.0,
                width,
                height,
            }],
        };

        for (width, height) in [(Some(-20.0), Some(0.0)), (Some(10.0), Some(f64::NAN))] {
            let err = commit(State(state()), Json(bad(width, height))).await.unwrap_err();
            assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn committed_items_pass_template_validation() {
        let req = CommitRequest {
            template: template(),
            container: Size::new(800.0, 600.0),
            moves: vec![Move {
                item_id: "photo".into(),
                x: -5.0,
                y: 700.0,
                width: Some(0.5),
                height: None,
            }],
        };
        let Json(resp) = commit(State(state()), Json(req)).await.unwrap();
        let mut echoed = template();
        echoed.items = resp.items;
        assert!(echoed.validate().is_ok());
    }

    #[tokio::test]
    async fn preview_rejects_huge_container() {
        let req = PreviewRequest {
            template: template(),
            container: Size::new(1.0e6, 1.0e6),
        };
        let err = preview(State(state()), Json(req)).await.err().unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fit_rejects_empty_container() {
        let req = FitRequest {
            image: Size::new(100.0, 100.0),
            container: Size::new(0.0, 100.0),
        };
        assert_eq!(fit(Json(req)).await.unwrap_err().0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn preview_returns_png() {
        let req = PreviewRequest {
            template: template(),
            container: Size::new(400.0, 300.0),
        };
        let response = preview(State(state()), Json(req)).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }
}
