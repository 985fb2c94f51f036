//! Levels: the ordered catalog, which one is active, and (re)loading them.
//!
//! Loading a level throws away everything tagged [`LevelEntity`] and spawns
//! the level fresh, camera included. Requests arrive as messages so any
//! system can ask for a load without touching the world itself.

mod catalog;
mod movers;
mod spawn;

use crate::{config::NavigationConfig, navigation::NavigationSet};
use bevy::prelude::*;

pub use catalog::{
    LEVELS_FILE, LevelCatalog, LevelDefinition, LightDef, MoverDef, ObjectDef, PoseDef, ShapeDef,
};
pub use movers::Mover;

/// The level currently spawned.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ActiveLevel {
    pub index: usize,
    pub name: String,
}

/// Addresses a level in the [`LevelCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelRef {
    Index(usize),
    Name(String),
}

/// Request to load a level. The last request of a frame wins.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct LoadLevel(pub LevelRef);

/// Request to go to the next level, or back to the first after the last.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct AdvanceLevel;

/// Request to restart the active level.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ReloadLevel;

/// Everything spawned for a level; despawned when another one loads.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct LevelEntity;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelSet;

/// Level catalog handling. Inserts the builtin catalog unless one is already present.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<LevelCatalog>() {
            let catalog = LevelCatalog::builtin().unwrap_or_else(|err| {
                error!("Builtin level catalog is broken: {err}");
                LevelCatalog::default()
            });
            app.insert_resource(catalog);
        }

        app.add_message::<LoadLevel>()
            .add_message::<AdvanceLevel>()
            .add_message::<ReloadLevel>()
            .init_resource::<NavigationConfig>()
            .configure_sets(Update, LevelSet.after(NavigationSet::Reload))
            .add_systems(Startup, load_first_level)
            .add_systems(
                Update,
                (
                    movers::animate_movers.before(NavigationSet::Move),
                    (advance_level, reload_level, load_requested_level)
                        .chain()
                        .in_set(LevelSet),
                ),
            );
    }
}

fn load_first_level(mut load: MessageWriter<LoadLevel>) {
    load.write(LoadLevel(LevelRef::Index(0)));
}

fn advance_level(
    mut advance: MessageReader<AdvanceLevel>,
    catalog: Res<LevelCatalog>,
    active: Option<Res<ActiveLevel>>,
    mut load: MessageWriter<LoadLevel>,
) {
    if advance.read().count() == 0 {
        return;
    }

    let next = match active {
        Some(active) => catalog.next_index(active.index),
        None => 0,
    };
    load.write(LoadLevel(LevelRef::Index(next)));
}

fn reload_level(
    mut reload: MessageReader<ReloadLevel>,
    active: Option<Res<ActiveLevel>>,
    mut load: MessageWriter<LoadLevel>,
) {
    if reload.read().count() == 0 {
        return;
    }

    // by index, names need not be unique
    if let Some(active) = active {
        load.write(LoadLevel(LevelRef::Index(active.index)));
    }
}

fn load_requested_level(
    mut commands: Commands,
    mut requests: MessageReader<LoadLevel>,
    catalog: Res<LevelCatalog>,
    config: Res<NavigationConfig>,
    existing: Query<Entity, With<LevelEntity>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(LoadLevel(request)) = requests.read().last().cloned() else {
        return;
    };

    let Some((index, level)) = catalog
        .resolve(&request)
        .and_then(|index| catalog.get(index).map(|level| (index, level)))
    else {
        warn!("No level matches {request:?}, staying put");
        return;
    };

    for entity in &existing {
        commands.entity(entity).try_despawn();
    }

    spawn::spawn_level(
        &mut commands,
        level,
        config.motion(),
        &mut meshes,
        &mut materials,
    );
    commands.insert_resource(ActiveLevel {
        index,
        name: level.name.clone(),
    });

    info!("Loaded level {} \"{}\"", index, level.name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{CameraTarget, Finish, Navigator};

    fn level(name: &str, objects: Vec<ObjectDef>) -> LevelDefinition {
        LevelDefinition {
            name: name.to_string(),
            camera: PoseDef {
                translation: [0.0, 4.0, 10.0],
                look_at: Some([0.0, 0.0, 0.0]),
                rotation: [0.0; 3],
            },
            light: LightDef::default(),
            objects,
        }
    }

    fn object(name: &str, finish: bool, with_target: bool) -> ObjectDef {
        ObjectDef {
            name: name.to_string(),
            shape: ShapeDef::Sphere { radius: 0.5 },
            color: [0.8, 0.2, 0.2],
            pose: PoseDef::default(),
            finish,
            camera_target: with_target.then(|| PoseDef {
                translation: [0.0, 1.0, 0.0],
                look_at: None,
                rotation: [0.0; 3],
            }),
            mover: None,
        }
    }

    fn test_app() -> App {
        app_with_catalog(LevelCatalog::new(vec![
            level("First", vec![object("Walker", false, true)]),
            level(
                "Second",
                vec![object("Door", true, false), object("Bench", false, true)],
            ),
        ]))
    }

    fn app_with_catalog(catalog: LevelCatalog) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), TransformPlugin))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(catalog)
            .add_plugins(LevelPlugin);
        app
    }

    fn active(app: &App) -> ActiveLevel {
        app.world().resource::<ActiveLevel>().clone()
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<(), F>()
            .iter(app.world())
            .count()
    }

    fn request(app: &mut App, message: impl Message) {
        app.world_mut().write_message(message);
        app.update();
    }

    #[test]
    fn test_first_level_loads_on_startup() {
        let mut app = test_app();
        app.update();

        assert_eq!(
            active(&app),
            ActiveLevel {
                index: 0,
                name: "First".into()
            }
        );
        assert_eq!(count::<With<Navigator>>(&mut app), 1);
        assert_eq!(count::<With<CameraTarget>>(&mut app), 1);
        assert_eq!(count::<With<Finish>>(&mut app), 0);
    }

    #[test]
    fn test_advance_moves_on_then_wraps() {
        let mut app = test_app();
        app.update();

        request(&mut app, AdvanceLevel);
        assert_eq!(active(&app).index, 1);
        assert_eq!(count::<With<Finish>>(&mut app), 1);
        assert_eq!(count::<With<Navigator>>(&mut app), 1);

        request(&mut app, AdvanceLevel);
        assert_eq!(active(&app).index, 0);
        assert_eq!(count::<With<Finish>>(&mut app), 0);
    }

    #[test]
    fn test_reload_respawns_same_level() {
        let mut app = test_app();
        app.update();
        request(&mut app, AdvanceLevel);
        let camera_before = app
            .world_mut()
            .query_filtered::<Entity, With<Navigator>>()
            .single(app.world())
            .unwrap();

        request(&mut app, ReloadLevel);

        assert_eq!(
            active(&app),
            ActiveLevel {
                index: 1,
                name: "Second".into()
            }
        );
        let camera_after = app
            .world_mut()
            .query_filtered::<Entity, With<Navigator>>()
            .single(app.world())
            .unwrap();
        assert_ne!(camera_before, camera_after);
    }

    #[test]
    fn test_unknown_level_keeps_active_one() {
        let mut app = test_app();
        app.update();
        let before = count::<With<LevelEntity>>(&mut app);

        request(&mut app, LoadLevel(LevelRef::Index(7)));
        assert_eq!(active(&app).index, 0);

        request(&mut app, LoadLevel(LevelRef::Name("Missing".into())));
        assert_eq!(active(&app).index, 0);
        assert_eq!(count::<With<LevelEntity>>(&mut app), before);
    }

    #[test]
    fn test_load_by_name() {
        let mut app = test_app();
        app.update();

        request(&mut app, LoadLevel(LevelRef::Name("Second".into())));
        assert_eq!(active(&app).index, 1);
    }

    #[test]
    fn test_camera_parented_into_level_is_cleaned_up() {
        let mut app = test_app();
        app.update();

        let target = app
            .world_mut()
            .query_filtered::<Entity, With<CameraTarget>>()
            .single(app.world())
            .unwrap();
        let camera = app
            .world_mut()
            .query_filtered::<Entity, With<Navigator>>()
            .single(app.world())
            .unwrap();
        app.world_mut().entity_mut(camera).insert(ChildOf(target));

        request(&mut app, ReloadLevel);

        assert!(app.world().get_entity(camera).is_err());
        assert_eq!(count::<With<Navigator>>(&mut app), 1);
    }

    #[test]
    fn test_last_load_request_in_a_frame_wins() {
        let mut app = test_app();
        app.update();

        app.world_mut()
            .write_message(LoadLevel(LevelRef::Index(1)));
        request(&mut app, LoadLevel(LevelRef::Index(0)));

        assert_eq!(active(&app).index, 0);
        assert_eq!(count::<With<Navigator>>(&mut app), 1);
        assert_eq!(count::<With<Finish>>(&mut app), 0);
    }

    #[test]
    fn test_reload_beats_advance_in_the_same_frame() {
        let mut app = test_app();
        app.update();

        app.world_mut().write_message(AdvanceLevel);
        request(&mut app, ReloadLevel);

        assert_eq!(active(&app).index, 0);
        assert_eq!(count::<With<Navigator>>(&mut app), 1);
    }

    #[test]
    fn test_reload_keeps_index_when_names_repeat() {
        let mut app = app_with_catalog(LevelCatalog::new(vec![
            level("Loop", vec![object("Walker", false, true)]),
            level("Loop", vec![object("Door", true, false)]),
        ]));
        app.update();
        request(&mut app, AdvanceLevel);
        assert_eq!(active(&app).index, 1);

        request(&mut app, ReloadLevel);

        assert_eq!(
            active(&app),
            ActiveLevel {
                index: 1,
                name: "Loop".into()
            }
        );
        assert_eq!(count::<With<Finish>>(&mut app), 1);
    }
}
