//! # Stencil CLI
//!
//! Command-line interface for template layouts.
//!
//! ## Usage
//!
//! ```bash
//! # Render a template as the editor would show it in an 800x600 container
//! stencil preview badge.json --png badge.png
//!
//! # Use a local file instead of fetching backgroundImageUrl
//! stencil preview badge.json --background badge-bg.jpg --width 1024 --height 768 --png out.png
//!
//! # Print the fit and the canvas-space bounds of every item
//! stencil preview badge.json --background badge-bg.jpg
//!
//! # Run the preview/commit HTTP API
//! stencil serve --listen 0.0.0.0:8080
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=stencil=debug` for detail.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use stencil::{
    StencilError,
    background::{DecodedBackground, HttpImageSource, ImageSource, StaticImageSource},
    editor::{BackgroundStatus, LayoutEditor},
    geometry::Size,
    preview,
    scene::Scene,
    server::{self, ServerConfig},
    template::Template,
};

/// Stencil - template layout editor
#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the editor scene for a template and describe or render it
    Preview {
        /// Template JSON file
        template: PathBuf,

        /// Container width in pixels
        #[arg(long, default_value = "800")]
        width: f64,

        /// Container height in pixels
        #[arg(long, default_value = "600")]
        height: f64,

        /// Local background image (skips fetching backgroundImageUrl)
        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,

        /// Write the rendered canvas to a PNG file
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Run the HTTP preview server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), StencilError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            template,
            width,
            height,
            background,
            png,
        } => preview_template(
            &template,
            Size::new(width, height),
            background.as_deref(),
            png.as_deref(),
        ),
        Commands::Serve { listen } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(ServerConfig { listen_addr: listen }))
        }
    }
}

fn preview_template(
    path: &Path,
    container: Size,
    background: Option<&Path>,
    png: Option<&Path>,
) -> Result<(), StencilError> {
    let template = Template::from_json(&std::fs::read_to_string(path)?)?;
    let url = template.background_image_url.clone();

    let mut editor = LayoutEditor::with_surface(container, |_| {});
    if let Some(request) = editor.set_template(template)? {
        let loaded = match background {
            Some(file) => load_local(&request.url, file),
            None => fetch_remote(&request.url),
        };
        editor.complete_load(&request, loaded);
    }

    match editor.status() {
        BackgroundStatus::Ready { size, .. } => {
            println!("Background: {} ({}x{})", url, size.width, size.height);
        }
        BackgroundStatus::Failed { reason, .. } => {
            return Err(StencilError::Image(format!(
                "background {} could not be loaded: {}",
                url, reason
            )));
        }
        BackgroundStatus::Empty | BackgroundStatus::Loading { .. } => {
            println!("Template has no background; nothing to lay out");
        }
    }

    if let Some(fit) = editor.fit() {
        println!(
            "Canvas: {}x{} (scale {:.4})",
            fit.canvas.width, fit.canvas.height, fit.scale
        );
    }
    for item in editor.items() {
        let Some(bounds) = editor
            .object_for_item(&item.id)
            .and_then(|id| editor.scene().object(id))
            .map(|o| o.bounds())
        else {
            continue;
        };
        println!(
            "  {:<16} {:?} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            item.id, item.kind, bounds.x, bounds.y, bounds.width, bounds.height
        );
    }

    if let Some(out) = png {
        let bytes = preview::render_png(&editor.render(), editor.background().map(|b| b.image()))?;
        std::fs::write(out, bytes)?;
        println!("Saved preview to {}", out.display());
    }

    Ok(())
}

fn load_local(url: &str, file: &Path) -> Result<DecodedBackground, StencilError> {
    let image = image::open(file)
        .map_err(|e| StencilError::Image(format!("{}: {}", file.display(), e)))?;
    StaticImageSource::new().with(url, image).get(url)
}

fn fetch_remote(url: &str) -> Result<DecodedBackground, StencilError> {
    let source = HttpImageSource::new()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(source.fetch(url))
}
