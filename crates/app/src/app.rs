//! Application bootstrap: data directories, `tracing` logging and the Bevy `App` wrapper.

mod paths;

use paths::PathContext;
use std::marker::PhantomData;
use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Errors raised while bringing up the application infrastructure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create application directories: {0}")]
    Directories(#[source] std::io::Error),
    #[error("log file path {0:?} has no parent directory or file name")]
    InvalidLogPath(PathBuf),
    #[error("failed to install the global tracing subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

/// Identity of an application; decides where its data and logs live.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "chicken105";
    const PROJECT_ID: &'static str = "frame_of_reference";
}

/// Log level used for both the file and the console layer.
pub fn default_level() -> LevelFilter {
    #[cfg(debug_assertions)]
    let level = LevelFilter::INFO;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::WARN;

    level
}

fn path_context<A: Application>() -> PathContext {
    #[cfg(debug_assertions)]
    {
        let out = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".out");
        PathContext::with_base_path(out, A::STUDIO, A::PROJECT_ID, A::APP_ID)
    }
    #[cfg(not(debug_assertions))]
    {
        PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID)
    }
}

/// Installs logging for `A`, then hands out a Bevy app via [`AppBuilder::build_with_bevy`].
pub struct AppBuilder<A: Application> {
    #[cfg_attr(not(feature = "bevy"), allow(dead_code))]
    log_guard: WorkerGuard,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Creates the data directories and installs the global subscriber
    /// (non-blocking log file plus console).
    pub fn new(version: &'static str) -> Result<Self, AppError> {
        let paths = path_context::<A>();
        paths.ensure_directories().map_err(AppError::Directories)?;

        let log_file = paths.log_file_now();
        let (Some(log_dir), Some(log_name)) = (log_file.parent(), log_file.file_name()) else {
            return Err(AppError::InvalidLogPath(log_file));
        };
        let (writer, log_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_name));

        let level = default_level();
        let file_layer = fmt::Layer::default()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));
        let console_layer =
            fmt::Layer::default().with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .with(tracing_error::ErrorLayer::default())
            .try_init()?;

        tracing::info!(
            app_id = A::APP_ID,
            version,
            log_file = %log_file.display(),
            "logging initialised"
        );

        Ok(Self {
            log_guard,
            _marker: PhantomData,
        })
    }

    /// Creates the Bevy `App` and lets `configure` add plugins to it.
    #[cfg(feature = "bevy")]
    pub fn build_with_bevy(self, configure: impl FnOnce(&mut bevy::prelude::App)) -> BevyApp {
        let mut app = bevy::prelude::App::new();
        configure(&mut app);
        BevyApp {
            app,
            _log_guard: self.log_guard,
        }
    }
}

/// A Bevy app that keeps the log writer alive until it is dropped.
#[cfg(feature = "bevy")]
pub struct BevyApp {
    app: bevy::prelude::App,
    _log_guard: WorkerGuard,
}

#[cfg(feature = "bevy")]
impl BevyApp {
    /// Runs the Bevy application until it exits.
    pub fn run(&mut self) -> bevy::app::AppExit {
        self.app.run()
    }
}
