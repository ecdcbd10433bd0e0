#[cfg(feature = "native")]
use std::fs;
use std::path::PathBuf;
#[cfg(feature = "native")]
use std::path::Path;

#[cfg(feature = "native")]
use anyhow::{
  Context,
  anyhow
};
use serde::{
  Deserialize,
  Serialize
};
#[cfg(feature = "native")]
use tracing::{
  info,
  warn
};

pub const DEFAULT_TASKS_KEY: &str =
  "tasks";
pub const DEFAULT_THEME_KEY: &str =
  "theme";
pub const DEFAULT_POSTS_ENDPOINT: &str =
  "https://jsonplaceholder.typicode.com/posts";
pub const DEFAULT_POSTS_LIMIT: usize =
  10;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
  pub tasks_key:      String,
  pub theme_key:      String,
  pub posts_endpoint: String,
  pub posts_limit:    usize,
  pub data_dir:       Option<PathBuf>
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      tasks_key:      DEFAULT_TASKS_KEY
        .to_string(),
      theme_key:      DEFAULT_THEME_KEY
        .to_string(),
      posts_endpoint:
        DEFAULT_POSTS_ENDPOINT
          .to_string(),
      posts_limit:    DEFAULT_POSTS_LIMIT,
      data_dir:       None
    }
  }
}

impl AppConfig {
  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    Ok(toml::from_str(text)?)
  }

  #[cfg(feature = "native")]
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(
        config_override
      )?
    else {
      warn!(
        "no config file found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    Self::from_toml_str(&text)
      .with_context(|| {
        format!(
          "invalid config {}",
          path.display()
        )
      })
  }
}

#[cfg(feature = "native")]
#[tracing::instrument(skip(
  cfg,
  override_dir
))]
pub fn resolve_data_dir(
  cfg: &AppConfig,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = if let Some(path) =
    override_dir
  {
    path.to_path_buf()
  } else if let Some(cfg_value) =
    cfg.data_dir.as_deref()
  {
    expand_tilde(cfg_value)
  } else {
    default_data_dir()?
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

#[cfg(feature = "native")]
fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(expand_tilde(path)));
  }

  if let Ok(config_env) =
    std::env::var("TASKLET_CONFIG")
  {
    if config_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(expand_tilde(
      Path::new(&config_env)
    )));
  }

  let Some(config_dir) =
    dirs::config_dir()
  else {
    return Ok(None);
  };
  let candidate = config_dir
    .join("tasklet")
    .join("config.toml");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

#[cfg(feature = "native")]
fn default_data_dir()
-> anyhow::Result<PathBuf> {
  let home = dirs::home_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine home \
         directory"
      )
    })?;
  Ok(home.join(".tasklet"))
}

#[cfg(feature = "native")]
fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_gives_defaults() {
    let cfg =
      AppConfig::from_toml_str("")
        .unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.tasks_key, "tasks");
    assert_eq!(cfg.posts_limit, 10);
  }

  #[test]
  fn partial_document_keeps_other_defaults()
  {
    let cfg = AppConfig::from_toml_str(
      "tasks_key = \"todo\"\n\
       posts_limit = 5\n"
    )
    .unwrap();
    assert_eq!(cfg.tasks_key, "todo");
    assert_eq!(cfg.posts_limit, 5);
    assert_eq!(cfg.theme_key, "theme");
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(
      AppConfig::from_toml_str(
        "color = \"on\"\n"
      )
      .is_err()
    );
  }

  #[cfg(feature = "native")]
  #[test]
  fn data_dir_override_is_created() {
    let temp = tempfile::tempdir()
      .expect("tempdir");
    let target =
      temp.path().join("nested/slots");

    let dir = resolve_data_dir(
      &AppConfig::default(),
      Some(&target)
    )
    .expect("resolve");
    assert_eq!(dir, target);
    assert!(dir.is_dir());
  }
}
