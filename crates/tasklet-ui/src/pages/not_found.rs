use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::Link;

use crate::app::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
  html! {
      <div class="not-found">
          <h1 class="page-title">{ "Page not found" }</h1>
          <Link<Route> to={Route::Home}>{ "Back home" }</Link<Route>>
      </div>
  }
}
