//! # Editor Host
//!
//! Runs a [`LayoutEditor`] on a single-threaded Tokio `LocalSet`, the way a
//! UI thread would: background loads are spawned as local tasks and resize
//! notifications arrive over a `watch` channel held by the container.
//!
//! All methods must be called from inside a `LocalSet`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use stencil::background::HttpImageSource;
//! use stencil::editor::LayoutEditor;
//! use stencil::geometry::Size;
//! use stencil::host::EditorHost;
//! use stencil::template::Template;
//!
//! # async fn example() -> Result<(), stencil::StencilError> {
//! let local = tokio::task::LocalSet::new();
//! local
//!     .run_until(async {
//!         let editor = LayoutEditor::with_surface(Size::new(800.0, 600.0), |items| {
//!             println!("save {} items", items.len());
//!         });
//!         let (host, container) = EditorHost::mount(editor, Arc::new(HttpImageSource::new()?));
//!         host.update_template(Template::new("t1", "https://cdn.example/bg.png"))?;
//!         container.resize(Size::new(1024.0, 768.0));
//!         host.unmount();
//!         Ok::<_, stencil::StencilError>(())
//!     })
//!     .await
//! # }
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::background::ImageSource;
use crate::editor::{LayoutEditor, LoadOutcome, LoadRequest};
use crate::error::StencilError;
use crate::geometry::{Point, Size};
use crate::scene::{Frame, Scene, Surface};
use crate::template::Template;

/// The container side of the resize channel.
#[derive(Debug)]
pub struct ContainerHandle {
    tx: watch::Sender<Size>,
}

impl ContainerHandle {
    /// Publish the container's new pixel size.
    pub fn resize(&self, size: Size) {
        self.tx.send_replace(size);
    }

    pub fn size(&self) -> Size {
        *self.tx.borrow()
    }
}

/// A mounted editor plus the tasks feeding it.
pub struct EditorHost<S: Scene + 'static = Surface> {
    editor: Rc<RefCell<LayoutEditor<S>>>,
    source: Arc<dyn ImageSource>,
    resize_task: JoinHandle<()>,
}

impl<S: Scene + 'static> EditorHost<S> {
    /// Mount `editor` and start listening for container resizes.
    pub fn mount(editor: LayoutEditor<S>, source: Arc<dyn ImageSource>) -> (Self, ContainerHandle) {
        let (tx, rx) = watch::channel(editor.container());
        let editor = Rc::new(RefCell::new(editor));
        let resize_task = tokio::task::spawn_local(watch_container(
            Rc::downgrade(&editor),
            source.clone(),
            rx,
        ));

        (
            Self {
                editor,
                source,
                resize_task,
            },
            ContainerHandle { tx },
        )
    }

    /// Hand the editor a fresh template. Returns the spawned background load,
    /// if one was needed.
    pub fn update_template(
        &self,
        template: Template,
    ) -> Result<Option<JoinHandle<LoadOutcome>>, StencilError> {
        let request = self.editor.borrow_mut().set_template(template)?;
        Ok(request.map(|r| spawn_load(Rc::downgrade(&self.editor), self.source.clone(), r)))
    }

    /// Re-issue a failed background load.
    pub fn retry_background(&self) -> Option<JoinHandle<LoadOutcome>> {
        let request = self.editor.borrow_mut().retry_background()?;
        Some(spawn_load(
            Rc::downgrade(&self.editor),
            self.source.clone(),
            request,
        ))
    }

    pub fn pointer_down(&self, p: Point) {
        self.editor.borrow_mut().pointer_down(p);
    }

    pub fn pointer_move(&self, p: Point) {
        self.editor.borrow_mut().pointer_move(p);
    }

    pub fn pointer_up(&self, p: Point) {
        self.editor.borrow_mut().pointer_up(p);
    }

    pub fn render(&self) -> Frame {
        self.editor.borrow().render()
    }

    /// Run `f` against the editor.
    pub fn with_editor<R>(&self, f: impl FnOnce(&LayoutEditor<S>) -> R) -> R {
        f(&self.editor.borrow())
    }

    /// Dispose the editor and stop listening for resizes. Loads still in
    /// flight finish as no-ops.
    pub fn unmount(self) {
        self.resize_task.abort();
        self.editor.borrow_mut().dispose();
    }
}

async fn watch_container<S: Scene + 'static>(
    editor: Weak<RefCell<LayoutEditor<S>>>,
    source: Arc<dyn ImageSource>,
    mut rx: watch::Receiver<Size>,
) {
    while rx.changed().await.is_ok() {
        let size = *rx.borrow_and_update();
        let Some(strong) = editor.upgrade() else {
            break;
        };
        let request = strong.borrow_mut().resize(size);
        if let Some(request) = request {
            spawn_load(editor.clone(), source.clone(), request);
        }
    }
}

fn spawn_load<S: Scene + 'static>(
    editor: Weak<RefCell<LayoutEditor<S>>>,
    source: Arc<dyn ImageSource>,
    request: LoadRequest,
) -> JoinHandle<LoadOutcome> {
    tokio::task::spawn_local(async move {
        let result = source.fetch(&request.url).await;
        match editor.upgrade() {
            Some(editor) => editor.borrow_mut().complete_load(&request, result),
            None => {
                tracing::debug!(url = %request.url, "background load finished after unmount");
                LoadOutcome::Disposed
            }
        }
    })
}
