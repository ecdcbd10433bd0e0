use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CardProps {
  #[prop_or_default]
  pub title:    Option<String>,
  #[prop_or_default]
  pub children: Html
}

#[function_component(Card)]
pub fn card(props: &CardProps) -> Html {
  html! {
      <div class="card">
          if let Some(title) = props.title.as_ref() {
              <h2 class="card-title">{ title }</h2>
          }
          { props.children.clone() }
      </div>
  }
}
