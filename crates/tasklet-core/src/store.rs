use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::marker::PhantomData;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::anyhow;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A durable key-value slot backend: exact-key lookup of string values.
///
/// Implementations are single-threaded handles; cloning one yields another
/// handle onto the same slots.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove_item(key)
    }
}

/// In-memory slots, optionally capped like a browser storage quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<BTreeMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any write that would push the summed key and value lengths
    /// above `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: Rc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(anyhow!(
                    "quota exceeded writing {key}: {needed} > {quota} bytes"
                ));
            }
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file::FileStore;

#[cfg(feature = "native")]
mod file {
    use std::fs;
    use std::io::{ErrorKind, Write};
    use std::path::{Path, PathBuf};

    use anyhow::{Context, anyhow};
    use tempfile::NamedTempFile;
    use tracing::{debug, info};

    use super::KeyValueStore;

    /// One `<key>.data` file per slot inside a data directory.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        pub data_dir: PathBuf,
    }

    impl FileStore {
        #[tracing::instrument(skip(data_dir))]
        pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
            let data_dir = data_dir.to_path_buf();
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("failed to create {}", data_dir.display()))?;

            info!(data_dir = %data_dir.display(), "opened slot directory");
            Ok(Self { data_dir })
        }

        pub fn slot_path(&self, key: &str) -> anyhow::Result<PathBuf> {
            let valid = !key.is_empty()
                && key
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
                && !key.starts_with('.');
            if !valid {
                return Err(anyhow!("invalid slot key: {key:?}"));
            }
            Ok(self.data_dir.join(format!("{key}.data")))
        }
    }

    impl KeyValueStore for FileStore {
        #[tracing::instrument(skip(self))]
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            let path = self.slot_path(key)?;
            match fs::read_to_string(&path) {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err).with_context(|| format!("failed reading {}", path.display())),
            }
        }

        #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            let path = self.slot_path(key)?;
            debug!(file = %path.display(), "writing slot atomically");

            let mut temp = NamedTempFile::new_in(&self.data_dir)?;
            temp.write_all(value.as_bytes())?;
            temp.flush()?;
            temp.persist(&path)
                .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
            Ok(())
        }

        #[tracing::instrument(skip(self))]
        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            let path = self.slot_path(key)?;
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err).with_context(|| format!("failed removing {}", path.display())),
            }
        }
    }
}

/// How a value is turned into the string held by a slot and back.
pub trait SlotCodec<T> {
    fn encode(value: &T) -> anyhow::Result<String>;
    fn decode(raw: &str) -> anyhow::Result<T>;
}

/// JSON text, via serde.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> SlotCodec<T> for JsonCodec {
    fn encode(value: &T) -> anyhow::Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(raw: &str) -> anyhow::Result<T> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// The bare `Display` form, read back with `FromStr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl<T> SlotCodec<T> for PlainCodec
where
    T: FromStr + Display,
    T::Err: Display,
{
    fn encode(value: &T) -> anyhow::Result<String> {
        Ok(value.to_string())
    }

    fn decode(raw: &str) -> anyhow::Result<T> {
        raw.trim()
            .parse::<T>()
            .map_err(|err| anyhow!("invalid slot value {raw:?}: {err}"))
    }
}

/// An in-memory value shadowed into one durable slot.
///
/// Loading falls back to the supplied default when the slot is empty or does
/// not decode. Every `set`/`update` rewrites the slot before returning.
/// Storage and encoding failures are logged and swallowed: the in-memory
/// value stays authoritative for the session.
pub struct PersistentValue<T, S, C = JsonCodec> {
    store: S,
    key: String,
    value: T,
    initialized: bool,
    persisted_ok: bool,
    codec: PhantomData<C>,
}

impl<T, S, C> PersistentValue<T, S, C>
where
    S: KeyValueStore,
    C: SlotCodec<T>,
{
    #[tracing::instrument(skip(store, key, default), fields(key = %key.as_ref()))]
    pub fn load(store: S, key: impl AsRef<str>, default: T) -> Self {
        let key = key.as_ref().to_string();
        let loaded = match store.get_item(&key) {
            Ok(Some(raw)) => match C::decode(&raw) {
                Ok(value) => Some(value),
                Err(error) => {
                    warn!(%error, key = %key, "slot content did not decode; using default");
                    None
                }
            },
            Ok(None) => {
                debug!(key = %key, "slot empty; using default");
                None
            }
            Err(error) => {
                warn!(error = %format!("{error:#}"), key = %key, "slot unreadable; using default");
                None
            }
        };

        let initialized = loaded.is_some();
        Self {
            store,
            key,
            value: loaded.unwrap_or(default),
            initialized,
            persisted_ok: initialized,
            codec: PhantomData,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// True once the slot has held a valid value: loaded from it, or
    /// successfully written during this session.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the slot currently mirrors the in-memory value.
    pub fn persisted_ok(&self) -> bool {
        self.persisted_ok
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut T) -> R) -> R {
        let out = mutate(&mut self.value);
        self.persist();
        out
    }

    fn persist(&mut self) {
        let written = C::encode(&self.value)
            .and_then(|raw| self.store.set_item(&self.key, &raw).map(|()| raw.len()));

        match written {
            Ok(bytes) => {
                debug!(key = %self.key, bytes, "persisted slot");
                self.initialized = true;
                self.persisted_ok = true;
            }
            Err(error) => {
                warn!(
                    error = %format!("{error:#}"),
                    key = %self.key,
                    "failed to persist slot; keeping in-memory value"
                );
                self.persisted_ok = false;
            }
        }
    }
}

impl<T: std::fmt::Debug, S, C> std::fmt::Debug for PersistentValue<T, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentValue")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("initialized", &self.initialized)
            .field("persisted_ok", &self.persisted_ok)
            .finish()
    }
}
