use anyhow::Result;
use app::{AppBuilder, Application};
use bevy::{log::LogPlugin, prelude::*};
use frame_of_reference::FrameOfReferencePlugin;

struct FrameOfReference;

impl Application for FrameOfReference {
    const APP_ID: &'static str = "frame_of_reference";
}

fn main() -> Result<()> {
    let mut game = AppBuilder::<FrameOfReference>::new(env!("CARGO_PKG_VERSION"))?
        .build_with_bevy(|app| {
            app.add_plugins(
                DefaultPlugins
                    .build()
                    // tracing is already installed by AppBuilder
                    .disable::<LogPlugin>()
                    .set(WindowPlugin {
                        primary_window: Some(Window {
                            title: "Frame of Reference".to_string(),
                            ..default()
                        }),
                        ..default()
                    }),
            )
            .add_plugins(FrameOfReferencePlugin);
        });

    match game.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("game exited with code {code}"),
    }
}
