#[cfg(feature = "native")]
pub mod cli;
#[cfg(feature = "native")]
pub mod commands;
pub mod config;
pub mod controller;
pub mod posts;
#[cfg(feature = "native")]
pub mod render;
pub mod store;
pub mod task;
pub mod theme;

pub use controller::{
  TaskCounts,
  TaskEvent,
  TaskListController
};
pub use store::{
  KeyValueStore,
  MemoryStore,
  PersistentValue
};
pub use task::{
  FilterMode,
  Task,
  TaskId
};
pub use theme::{
  Theme,
  ThemePreference
};

#[cfg(feature = "native")]
use std::ffi::OsString;

#[cfg(feature = "native")]
use anyhow::Context;
#[cfg(feature = "native")]
use clap::Parser;
#[cfg(feature = "native")]
use tracing::{
  debug,
  info
};

#[cfg(feature = "native")]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting tasklet CLI"
  );

  let cfg = config::AppConfig::load(
    cli.config.as_deref()
  )?;
  debug!(?cfg, "resolved config");

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let store =
    store::FileStore::open(&data_dir)
      .with_context(|| {
        format!(
          "failed to open slot \
           directory at {}",
          data_dir.display()
        )
      })?;

  let renderer =
    render::Renderer::new();
  let command =
    cli.command.unwrap_or_default();

  commands::dispatch(
    store,
    &cfg,
    &renderer,
    task::SystemClock,
    command,
    std::io::stdout().lock()
  )?;

  info!("done");
  Ok(())
}
