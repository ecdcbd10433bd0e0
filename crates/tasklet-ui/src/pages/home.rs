use yew::{
  Html,
  function_component,
  html
};

#[function_component(HomePage)]
pub fn home_page() -> Html {
  html! {
      <h1 class="page-title">{ "Welcome to the Tasklet demo app" }</h1>
  }
}
