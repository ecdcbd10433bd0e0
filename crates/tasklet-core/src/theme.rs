use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use tracing::debug;

use crate::store::{KeyValueStore, PersistentValue, PlainCodec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Class placed on the document root while this theme is active.
    pub fn root_class(self) -> Option<&'static str> {
        match self {
            Self::Light => None,
            Self::Dark => Some("dark"),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "🌙 Dark",
            Self::Dark => "☀️ Light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(anyhow!("unknown theme {other:?}")),
        }
    }
}

/// The theme choice, kept in its own slot as the bare `light`/`dark` string.
#[derive(Debug)]
pub struct ThemePreference<S> {
    slot: PersistentValue<Theme, S, PlainCodec>,
}

impl<S: KeyValueStore> ThemePreference<S> {
    pub fn load(store: S, key: &str) -> Self {
        Self {
            slot: PersistentValue::load(store, key, Theme::default()),
        }
    }

    pub fn theme(&self) -> Theme {
        *self.slot.get()
    }

    pub fn set(&mut self, theme: Theme) {
        debug!(%theme, "setting theme");
        self.slot.set(theme);
    }

    pub fn toggle(&mut self) -> Theme {
        let next = self.theme().next();
        self.set(next);
        next
    }
}
