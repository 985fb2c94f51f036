//! Frame of Reference: click something, the camera flies over and rides along.
//!
//! [`FrameOfReferencePlugin`] wires the pieces together on top of Bevy's
//! `DefaultPlugins`. Tests and tools can pick the individual plugins instead.

pub mod config;
pub mod levels;
pub mod navigation;

use bevy::prelude::*;
use config::{NAVIGATION_CONFIG_FILE, NavigationConfig, assets_dir};
use levels::{LEVELS_FILE, LevelCatalog, LevelPlugin};
use navigation::{NavigationPlugin, PointerPickingPlugin};

/// The whole game minus the engine's default plugins.
///
/// Reads `config/navigation.ron` and `levels.ron` from the assets directory
/// at build time; both fall back to built-in defaults.
pub struct FrameOfReferencePlugin;

impl Plugin for FrameOfReferencePlugin {
    fn build(&self, app: &mut App) {
        let assets = assets_dir();
        let config =
            NavigationConfig::load_or_default(&assets.join("config").join(NAVIGATION_CONFIG_FILE));
        let catalog = LevelCatalog::load_or_builtin(&assets.join(LEVELS_FILE));

        app.insert_resource(config)
            .insert_resource(catalog)
            .add_plugins((NavigationPlugin, PointerPickingPlugin, LevelPlugin));
    }
}
