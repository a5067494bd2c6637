//! `favd render`: one snapshot through the grid and star widgets, printed
//! as text.

use favorites_dashboard::config::loader::ConfigLoader;
use favorites_dashboard::config::ConfigError;
use favorites_dashboard::grid::FavoritesGrid;
use favorites_dashboard::service::StoreClient;
use favorites_dashboard::star::StarWrapper;
use favorites_dashboard::{tui, EntityStatus};
use favorites_store::FavoritesStore;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

/// Inputs of one render.
#[derive(Debug)]
pub(crate) struct RenderArgs<'a> {
    pub states: &'a Path,
    pub store: Option<&'a Path>,
    pub user: &'a str,
    pub width: u16,
    pub config: Option<&'a Path>,
}

#[derive(Debug, Error)]
pub(crate) enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read states file {path}: {source}")]
    ReadStates {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid states file {path}: {source}")]
    ParseStates {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] favorites_store::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Renders the grid for `args.user` and prints it.
pub(crate) fn run_render_command(args: &RenderArgs<'_>) -> ExitCode {
    match render(args) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Render error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Grid lines followed by one line per configured star.
pub(crate) fn render(args: &RenderArgs<'_>) -> Result<Vec<String>, RenderError> {
    let config = ConfigLoader::load(args.config)?;
    let states = read_states(args.states)?;
    let store = match args.store {
        Some(path) => FavoritesStore::load(path)?,
        None => FavoritesStore::load(favorites_store::default_store_path())?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(RenderError::Runtime)?;
    let client = StoreClient::new(store);
    let home = Arc::new(runtime.block_on(client.snapshot(Some(args.user), states)));

    let mut grid = FavoritesGrid::new(config.grid.clone(), config.timing.timings()?)?;
    grid.ingest(Arc::clone(&home));
    tracing::debug!("rendering {} favorites", grid.favorites().len());
    let mut lines = tui::render_lines(grid.view(), args.width);

    for star_config in &config.favoritable {
        let mut star = StarWrapper::new(star_config.clone())?;
        star.ingest(&home);
        let view = star.view();
        if view.visible {
            let glyph = if view.is_favorite { "★" } else { "☆" };
            lines.push(format!("{} {}", glyph, star.entity_id()));
        }
    }
    Ok(lines)
}

fn read_states(path: &Path) -> Result<HashMap<String, EntityStatus>, RenderError> {
    let content = fs::read_to_string(path).map_err(|source| RenderError::ReadStates {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| RenderError::ParseStates {
        path: path.to_path_buf(),
        source,
    })
}
