use yew::{
  Html,
  MouseEvent,
  function_component,
  html,
  use_context
};
use yew_router::prelude::Link;

use super::{
  Button,
  ButtonVariant
};
use crate::app::{
  Route,
  ThemeContext
};

#[function_component(Navbar)]
pub fn navbar() -> Html {
  let Some(theme) =
    use_context::<ThemeContext>()
  else {
    tracing::error!(
      "navbar rendered outside theme \
       context"
    );
    return Html::default();
  };

  let on_toggle = {
    let toggle = theme.on_toggle.clone();
    move |_: MouseEvent| toggle.emit(())
  };

  html! {
      <nav class="navbar">
          <div class="nav-links">
              {
                  for Route::NAV.iter().map(|route| html! {
                      <Link<Route> to={*route}>{ route.nav_label() }</Link<Route>>
                  })
              }
          </div>
          <Button
              variant={ButtonVariant::Secondary}
              title={format!("Switch to {} theme", theme.theme.next())}
              onclick={on_toggle}
          >
              { theme.theme.toggle_label() }
          </Button>
      </nav>
  }
}
