pub(crate) use super::*;
pub(crate) use crate::config::{GridConfig, Theme, Timings};
pub(crate) use crate::test_utils::{home_with, sample_home, thermostat, USER};


pub(crate) fn new_grid() -> FavoritesGrid {
    FavoritesGrid::new(GridConfig::default(), Timings::default()).expect("default config is valid")
}

/// Grid that has ingested [`sample_home`].
pub(crate) fn loaded_grid() -> FavoritesGrid {
    let mut grid = new_grid();
    grid.ingest(Arc::new(sample_home()));
    grid
}

pub(crate) fn item_ids(grid: &FavoritesGrid) -> Vec<String> {
    grid.view()
        .items()
        .iter()
        .map(|i| i.entity_id.clone())
        .collect()
}

pub(crate) fn calls(commands: &[Command]) -> Vec<ServiceCall> {
    commands
        .iter()
        .filter_map(|c| match c {
            Command::Call(call) => Some(call.clone()),
            _ => None,
        })
        .collect()
}

pub(crate) fn change(entity_id: &str, is_favorite: bool, user: Option<&str>) -> FavoriteChanged {
    FavoriteChanged {
        entity_id: entity_id.to_string(),
        is_favorite,
        user_id: user.map(str::to_string),
    }
}
