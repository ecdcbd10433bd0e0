use tasklet_core::config::AppConfig;
use tasklet_core::theme::{
  Theme,
  ThemePreference
};
use yew::{
  Callback,
  ContextProvider,
  Html,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_mut_ref,
  use_state
};
use yew_router::prelude::{
  BrowserRouter,
  Routable,
  Switch
};

use crate::components::Layout;
use crate::pages::{
  HomePage,
  NotFoundPage,
  PostsPage,
  TasksPage
};
use crate::storage::BrowserStore;

#[derive(
  Clone, Copy, Debug, PartialEq, Eq,
  Routable,
)]
pub enum Route {
  #[at("/")]
  Home,
  #[at("/tasks")]
  Tasks,
  #[at("/api")]
  Posts,
  #[not_found]
  #[at("/404")]
  NotFound
}

impl Route {
  pub const NAV: [Route; 3] = [
    Route::Home,
    Route::Tasks,
    Route::Posts
  ];

  pub fn nav_label(
    self
  ) -> &'static str {
    match self {
      | Self::Home => "Home",
      | Self::Tasks => "Tasks",
      | Self::Posts => "API",
      | Self::NotFound => "Not found"
    }
  }
}

/// Current theme plus the way to change it, handed to whoever renders the
/// toggle.
#[derive(Clone, PartialEq)]
pub struct ThemeContext {
  pub theme:     Theme,
  pub on_toggle: Callback<()>
}

fn switch(route: Route) -> Html {
  tracing::debug!(
    ?route,
    "rendering route"
  );
  match route {
    | Route::Home => {
      html! { <HomePage /> }
    }
    | Route::Tasks => {
      html! { <TasksPage /> }
    }
    | Route::Posts => {
      html! { <PostsPage /> }
    }
    | Route::NotFound => {
      html! { <NotFoundPage /> }
    }
  }
}

fn apply_root_theme(theme: Theme) {
  let Some(root) = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.document_element()
    })
  else {
    return;
  };

  let dark_class = Theme::Dark
    .root_class()
    .unwrap_or("dark");
  let enabled =
    theme.root_class().is_some();
  if let Err(error) = root
    .class_list()
    .toggle_with_force(
      dark_class, enabled
    )
  {
    tracing::error!(
      ?error,
      "failed toggling root theme \
       class"
    );
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let config =
    use_memo((), |_| {
      AppConfig::default()
    });
  let preference = {
    let key = config.theme_key.clone();
    use_mut_ref(move || {
      ThemePreference::load(
        BrowserStore::open(),
        &key
      )
    })
  };
  let theme = {
    let preference =
      preference.clone();
    use_state(move || {
      preference.borrow().theme()
    })
  };

  use_effect_with(*theme, |theme| {
    apply_root_theme(*theme);
    tracing::debug!(
      theme = %theme,
      "applied theme"
    );
    || ()
  });

  let on_toggle = {
    let theme = theme.clone();
    Callback::from(move |()| {
      let next = preference
        .borrow_mut()
        .toggle();
      theme.set(next);
    })
  };

  let theme_context = ThemeContext {
    theme: *theme,
    on_toggle
  };

  html! {
      <ContextProvider<AppConfig> context={(*config).clone()}>
          <ContextProvider<ThemeContext> context={theme_context}>
              <BrowserRouter>
                  <Layout>
                      <Switch<Route> render={switch} />
                  </Layout>
              </BrowserRouter>
          </ContextProvider<ThemeContext>>
      </ContextProvider<AppConfig>>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn routes_map_to_original_paths() {
    assert_eq!(Route::Home.to_path(), "/");
    assert_eq!(
      Route::Tasks.to_path(),
      "/tasks"
    );
    assert_eq!(
      Route::Posts.to_path(),
      "/api"
    );
    assert_eq!(
      Route::recognize("/tasks"),
      Some(Route::Tasks)
    );
    assert_eq!(
      Route::not_found_route(),
      Some(Route::NotFound)
    );
  }

  #[test]
  fn nav_labels_follow_link_order() {
    let labels: Vec<&str> = Route::NAV
      .iter()
      .map(|route| route.nav_label())
      .collect();
    assert_eq!(
      labels,
      vec!["Home", "Tasks", "API"]
    );
  }
}
