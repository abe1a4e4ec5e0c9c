//! Subcommand implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use overlay_core::{
    DocumentSession, PageLoader, SaveController, SaveError, SessionConfig, SourceFile,
};
use overlay_http::{ClientConfig, HttpPdfService};
use serde::Serialize;
use tracing::{info, warn};

use crate::edits::EditSpec;

pub struct Context {
    service: Arc<HttpPdfService>,
    session_config: SessionConfig,
}

impl Context {
    pub fn new(client_config: ClientConfig, concurrency: usize) -> Result<Self> {
        let service = HttpPdfService::new(client_config)?;
        Ok(Self {
            service: Arc::new(service),
            session_config: SessionConfig::default().with_concurrency(concurrency),
        })
    }

    async fn open(&self, path: &Path) -> Result<DocumentSession> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        let loader = PageLoader::new(Arc::clone(&self.service));
        let mut session =
            DocumentSession::with_config(SourceFile::new(name, bytes), self.session_config.clone());
        session.set_progress_callback(|loaded, total| {
            info!("Loaded page {}/{}", loaded, total);
        });

        session.open(&loader).await?;
        Ok(session)
    }
}

/// Handler: `health`
pub async fn health(ctx: &Context) -> Result<()> {
    let status = ctx.service.health().await?;
    match status.engine {
        Some(engine) => println!("{} ({})", status.status, engine),
        None => println!("{}", status.status),
    }
    Ok(())
}

#[derive(Serialize)]
struct PageSummary {
    index: usize,
    width: u32,
    height: u32,
    regions: Vec<RegionSummary>,
}

#[derive(Serialize)]
struct RegionSummary {
    id: usize,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    text: String,
}

fn summarize(session: &DocumentSession) -> Vec<PageSummary> {
    session
        .pages()
        .iter()
        .map(|page| PageSummary {
            index: page.index(),
            width: page.raster().width(),
            height: page.raster().height(),
            regions: page
                .regions()
                .iter()
                .map(|r| {
                    let b = r.bounds();
                    RegionSummary {
                        id: r.id(),
                        x: b.x,
                        y: b.y,
                        width: b.width,
                        height: b.height,
                        text: r.current_text().to_string(),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Handler: `inspect`
pub async fn inspect(ctx: &Context, path: &Path, json: bool) -> Result<()> {
    let session = ctx.open(path).await?;
    let pages = summarize(&session);

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    let transform = session.transform();
    for page in &pages {
        println!(
            "Page {} ({}x{} px, {} regions)",
            page.index,
            page.width,
            page.height,
            page.regions.len()
        );
        for region in &page.regions {
            let overlay = transform.overlay_box(overlay_core::Rect::new(
                region.x,
                region.y,
                region.width,
                region.height,
            ));
            println!(
                "  [{}] ({:.1}, {:.1}) {:.1}x{:.1}  @screen ({:.0}, {:.0})  {:?}",
                region.id,
                region.x,
                region.y,
                region.width,
                region.height,
                overlay.left,
                overlay.top,
                region.text
            );
        }
    }
    Ok(())
}

/// Handler: `edit`
pub async fn edit(
    ctx: &Context,
    path: &Path,
    edits: &[EditSpec],
    out: Option<PathBuf>,
) -> Result<()> {
    let mut session = ctx.open(path).await?;

    for spec in edits {
        let transition = session.edit(spec.page, spec.id, &spec.text)?;
        info!(
            "Region {}:{} {:?} -> {:?}",
            spec.page, spec.id, transition.from, transition.to
        );
    }

    let saver = SaveController::new(Arc::clone(&ctx.service));
    let artifact = match saver.save(&session).await {
        Ok(artifact) => artifact,
        Err(SaveError::NothingToSave) => {
            println!("Nothing to save: no region text changed");
            return Ok(());
        }
        Err(e) => {
            warn!("Save failed: {}", e);
            return Err(anyhow!("Save failed: {}", e));
        }
    };

    let out = out.unwrap_or_else(|| path.with_file_name(&artifact.file_name));
    tokio::fs::write(&out, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "Saved {} modification(s) to {}",
        session.modifications().len(),
        out.display()
    );
    session.close();
    Ok(())
}
