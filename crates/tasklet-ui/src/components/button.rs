use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

#[derive(
  Clone, Copy, Debug, PartialEq, Eq,
  Default,
)]
pub enum ButtonVariant {
  #[default]
  Primary,
  Secondary,
  Danger
}

impl ButtonVariant {
  pub fn as_class(
    self
  ) -> &'static str {
    match self {
      | Self::Primary => "btn-primary",
      | Self::Secondary => {
        "btn-secondary"
      }
      | Self::Danger => "btn-danger"
    }
  }
}

#[derive(Properties, PartialEq)]
pub struct ButtonProps {
  #[prop_or_default]
  pub variant:  ButtonVariant,
  #[prop_or_default]
  pub onclick:  Callback<MouseEvent>,
  #[prop_or_default]
  pub disabled: bool,
  #[prop_or_default]
  pub title:    Option<String>,
  #[prop_or_default]
  pub children: Html
}

#[function_component(Button)]
pub fn button(
  props: &ButtonProps
) -> Html {
  html! {
      <button
          type="button"
          class={classes!("btn", props.variant.as_class())}
          disabled={props.disabled}
          title={props.title.clone()}
          onclick={props.onclick.clone()}
      >
          { props.children.clone() }
      </button>
  }
}
