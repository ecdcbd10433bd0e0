use yew::{
  Html,
  function_component,
  html
};

#[function_component(Footer)]
pub fn footer() -> Html {
  html! {
      <footer class="footer">
          <p>{ "© 2025 Tasklet. All rights reserved." }</p>
      </footer>
  }
}
