use anyhow::anyhow;
use tasklet_core::store::{
  KeyValueStore,
  MemoryStore
};
use wasm_bindgen::JsValue;

/// `window.localStorage`, or a session-only map when the browser refuses
/// access (private mode, disabled storage).
#[derive(Clone)]
pub enum BrowserStore {
  Local(web_sys::Storage),
  Session(MemoryStore)
}

impl BrowserStore {
  pub fn open() -> Self {
    let storage = web_sys::window()
      .and_then(|window| {
        window
          .local_storage()
          .ok()
          .flatten()
      });

    match storage {
      | Some(storage) => {
        Self::Local(storage)
      }
      | None => {
        tracing::warn!(
          "local storage unavailable; \
           changes will not outlive \
           this page"
        );
        Self::Session(MemoryStore::new())
      }
    }
  }
}

impl KeyValueStore for BrowserStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    match self {
      | Self::Local(storage) => storage
        .get_item(key)
        .map_err(|error| {
          js_error("read", key, error)
        }),
      | Self::Session(memory) => {
        memory.get_item(key)
      }
    }
  }

  fn set_item(
    &self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    match self {
      | Self::Local(storage) => storage
        .set_item(key, value)
        .map_err(|error| {
          js_error("write", key, error)
        }),
      | Self::Session(memory) => {
        memory.set_item(key, value)
      }
    }
  }

  fn remove_item(
    &self,
    key: &str
  ) -> anyhow::Result<()> {
    match self {
      | Self::Local(storage) => storage
        .remove_item(key)
        .map_err(|error| {
          js_error("remove", key, error)
        }),
      | Self::Session(memory) => {
        memory.remove_item(key)
      }
    }
  }
}

fn js_error(
  op: &str,
  key: &str,
  error: JsValue
) -> anyhow::Error {
  let detail = error
    .as_string()
    .unwrap_or_else(|| {
      format!("{error:?}")
    });
  anyhow!(
    "local storage {op} of {key} \
     failed: {detail}"
  )
}
