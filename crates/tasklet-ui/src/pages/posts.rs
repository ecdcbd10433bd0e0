use std::rc::Rc;

use tasklet_core::config::AppConfig;
use tasklet_core::posts::{
  self,
  Post
};
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  TargetCast,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_state
};

use crate::api::fetch_posts;
use crate::components::Card;

#[derive(Clone, PartialEq)]
enum FetchState {
  Loading,
  Failed(String),
  Loaded(Rc<Vec<Post>>)
}

#[function_component(PostsPage)]
pub fn posts_page() -> Html {
  let config = use_context::<AppConfig>()
    .unwrap_or_default();
  let state =
    use_state(|| FetchState::Loading);
  let query = use_state(String::new);

  {
    let state = state.clone();
    let endpoint =
      config.posts_endpoint.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          match fetch_posts(&endpoint)
            .await
          {
            | Ok(posts) => {
              tracing::info!(
                count = posts.len(),
                "fetched posts"
              );
              state.set(
                FetchState::Loaded(
                  Rc::new(posts)
                )
              );
            }
            | Err(error) => {
              tracing::error!(
                %error,
                endpoint = %endpoint,
                "failed fetching posts"
              );
              state.set(
                FetchState::Failed(error)
              );
            }
          }
        }
      );
      || ()
    });
  }

  let on_query = {
    let query = query.clone();
    Callback::from(
      move |event: InputEvent| {
        let input: HtmlInputElement =
          event.target_unchecked_into();
        query.set(input.value());
      }
    )
  };

  match &*state {
    | FetchState::Loading => html! {
        <p class="status">{ "Loading..." }</p>
    },
    | FetchState::Failed(error) => {
      html! {
          <p class="status error">{ format!("Error: {error}") }</p>
      }
    }
    | FetchState::Loaded(all) => {
      let matching = posts::search(
        all,
        &query,
        config.posts_limit
      );

      html! {
          <div class="posts-page">
              <input
                  class="search-input"
                  value={(*query).clone()}
                  oninput={on_query}
                  placeholder="Search posts..."
              />
              {
                  for matching.into_iter().map(|post| html! {
                      <Card key={post.id} title={post.title.clone()}>
                          <p>{ post.body.clone() }</p>
                      </Card>
                  })
              }
          </div>
      }
    }
  }
}
