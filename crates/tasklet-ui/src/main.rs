mod api;
mod app;
mod components;
mod pages;
mod storage;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  let Some(mount) = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.get_element_by_id("app")
    })
  else {
    tracing::error!(
      "no #app element in the page; \
       nothing to mount"
    );
    return;
  };

  tracing::info!(
    version = env!("CARGO_PKG_VERSION"),
    "mounting Tasklet"
  );
  yew::Renderer::<app::App>::with_root(
    mount
  )
  .render();
}
