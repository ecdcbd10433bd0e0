use std::rc::Rc;

use tasklet_core::config::AppConfig;
use tasklet_core::controller::{
  TaskCounts,
  TaskListController
};
use tasklet_core::task::{
  self,
  FilterMode,
  Task
};
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  KeyboardEvent,
  MouseEvent,
  TargetCast,
  classes,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_mut_ref,
  use_state
};

use crate::components::{
  Button,
  ButtonVariant,
  Card
};
use crate::storage::BrowserStore;

fn summary_line(
  counts: TaskCounts
) -> String {
  match counts.total {
    | 0 => "No tasks yet".to_string(),
    | total => {
      format!(
        "{} of {} left",
        counts.active, total
      )
    }
  }
}

#[function_component(TasksPage)]
pub fn tasks_page() -> Html {
  let config = use_context::<AppConfig>()
    .unwrap_or_default();
  let controller = {
    let key = config.tasks_key.clone();
    use_mut_ref(move || {
      TaskListController::open(
        BrowserStore::open(),
        &key
      )
    })
  };
  // Rendering reads this snapshot, never the controller, so a notification
  // arriving mid-mutation cannot collide with a borrow.
  let snapshot = {
    let controller = controller.clone();
    use_state(move || {
      Rc::new(
        controller
          .borrow()
          .tasks()
          .to_vec()
      )
    })
  };
  let draft = use_state(String::new);
  let filter =
    use_state(FilterMode::default);

  {
    let controller = controller.clone();
    let snapshot = snapshot.clone();
    use_effect_with((), move |_| {
      let subscription = controller
        .borrow_mut()
        .subscribe(move |event, tasks| {
          tracing::debug!(
            ?event,
            count = tasks.len(),
            "task list changed"
          );
          snapshot
            .set(Rc::new(tasks.to_vec()));
        });

      move || {
        controller
          .borrow_mut()
          .unsubscribe(subscription);
      }
    });
  }

  let on_add = {
    let controller = controller.clone();
    let draft = draft.clone();
    Callback::from(move |()| {
      let added = controller
        .borrow_mut()
        .add(draft.as_str());
      if added.is_some() {
        draft.set(String::new());
      }
    })
  };

  let on_input = {
    let draft = draft.clone();
    Callback::from(
      move |event: InputEvent| {
        let input: HtmlInputElement =
          event.target_unchecked_into();
        draft.set(input.value());
      }
    )
  };

  let on_keydown = {
    let on_add = on_add.clone();
    Callback::from(
      move |event: KeyboardEvent| {
        if event.key() == "Enter" {
          on_add.emit(());
        }
      }
    )
  };

  let on_add_click = {
    let on_add = on_add.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_add.emit(())
      }
    )
  };

  let filter_buttons = FilterMode::ALL
    .iter()
    .map(|mode| {
      let mode = *mode;
      let variant = if *filter == mode {
        ButtonVariant::Primary
      } else {
        ButtonVariant::Secondary
      };
      let filter = filter.clone();
      html! {
          <Button
              key={mode.as_key()}
              variant={variant}
              onclick={move |_: MouseEvent| filter.set(mode)}
          >
              { mode.label() }
          </Button>
      }
    })
    .collect::<Html>();

  let render_task = |task: &Task| {
    let id = task.id;
    let on_toggle = {
      let controller =
        controller.clone();
      move |_: MouseEvent| {
        controller
          .borrow_mut()
          .toggle(id);
      }
    };
    let on_delete = {
      let controller =
        controller.clone();
      move |_: MouseEvent| {
        controller
          .borrow_mut()
          .delete(id);
      }
    };
    let toggle_label = if task.completed
    {
      "Undo"
    } else {
      "Complete"
    };

    html! {
        <Card key={id.0}>
            <div class="task-row">
                <span class={classes!("task-text", task.completed.then_some("done"))}>
                    { task.text.clone() }
                </span>
                <div class="task-actions">
                    <Button variant={ButtonVariant::Secondary} onclick={on_toggle}>
                        { toggle_label }
                    </Button>
                    <Button variant={ButtonVariant::Danger} onclick={on_delete}>
                        { "Delete" }
                    </Button>
                </div>
            </div>
        </Card>
    }
  };

  let visible =
    task::filtered(&snapshot, *filter);
  let summary = summary_line(
    TaskCounts::of(&snapshot)
  );

  html! {
      <div class="tasks-page">
          <div class="task-entry">
              <input
                  class="task-input"
                  value={(*draft).clone()}
                  oninput={on_input}
                  onkeydown={on_keydown}
                  placeholder="Add a new task"
              />
              <Button
                  onclick={on_add_click}
                  disabled={draft.trim().is_empty()}
              >
                  { "Add" }
              </Button>
          </div>
          <div class="task-filters">{ filter_buttons }</div>
          { for visible.into_iter().map(render_task) }
          <p class="task-summary">{ summary }</p>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn summary_counts_active_tasks() {
    assert_eq!(
      summary_line(
        TaskCounts::default()
      ),
      "No tasks yet"
    );
    assert_eq!(
      summary_line(TaskCounts {
        total:     3,
        active:    1,
        completed: 2
      }),
      "1 of 3 left"
    );
  }
}
