use yew::{
  Html,
  Properties,
  classes,
  function_component,
  html,
  use_context
};

use super::{
  Footer,
  Navbar
};
use crate::app::ThemeContext;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
  #[prop_or_default]
  pub children: Html
}

#[function_component(Layout)]
pub fn layout(
  props: &LayoutProps
) -> Html {
  let theme_class =
    use_context::<ThemeContext>()
      .map(|ctx| ctx.theme.as_key())
      .unwrap_or("light");

  html! {
      <div class={classes!("app", format!("theme-{theme_class}"))}>
          <Navbar />
          <main class="content">{ props.children.clone() }</main>
          <Footer />
      </div>
  }
}
