use std::io::Write;

use tracing::{info, instrument};

use crate::cli::{Command, ThemeAction};
use crate::config::AppConfig;
use crate::controller::TaskListController;
use crate::render::Renderer;
use crate::store::KeyValueStore;
use crate::task::Clock;
use crate::theme::{Theme, ThemePreference};

#[instrument(skip(store, cfg, renderer, clock, out))]
pub fn dispatch<S, K, W>(
    store: S,
    cfg: &AppConfig,
    renderer: &Renderer,
    clock: K,
    command: Command,
    mut out: W,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    K: Clock,
    W: Write,
{
    match command {
        Command::Add { text } => {
            let mut list = TaskListController::with_clock(store, &cfg.tasks_key, clock);
            let text = text.join(" ");
            match list.add(&text) {
                Some(id) => {
                    info!(%id, "task added");
                    writeln!(out, "{id}")?;
                }
                None => renderer.write_notice(&mut out, "nothing to add: task text is blank")?,
            }
        }
        Command::Toggle { id } => {
            let mut list = TaskListController::with_clock(store, &cfg.tasks_key, clock);
            if list.toggle(id) {
                let state = match list.get(id) {
                    Some(task) if task.completed => "completed",
                    _ => "active",
                };
                writeln!(out, "task {id} is now {state}")?;
            } else {
                renderer.write_notice(&mut out, &format!("no task with id {id}"))?;
            }
        }
        Command::Delete { id } => {
            let mut list = TaskListController::with_clock(store, &cfg.tasks_key, clock);
            if list.delete(id) {
                writeln!(out, "deleted task {id}")?;
            } else {
                renderer.write_notice(&mut out, &format!("no task with id {id}"))?;
            }
        }
        Command::List { filter } => {
            let list = TaskListController::with_clock(store, &cfg.tasks_key, clock);
            let visible = list.filtered_view(filter);
            if visible.is_empty() {
                renderer.write_notice(&mut out, &format!("no {filter} tasks"))?;
            } else {
                renderer.write_task_table(&mut out, &visible)?;
            }
            renderer.write_counts(&mut out, list.counts())?;
        }
        Command::Theme { action } => {
            let mut pref = ThemePreference::load(store, &cfg.theme_key);
            match action {
                ThemeAction::Show => {}
                ThemeAction::Toggle => {
                    pref.toggle();
                }
                ThemeAction::Light => pref.set(Theme::Light),
                ThemeAction::Dark => pref.set(Theme::Dark),
            }
            renderer.write_theme(&mut out, pref.theme())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::task::{FilterMode, TaskId};

    fn run(store: &MemoryStore, command: Command) -> String {
        let mut out = Vec::new();
        dispatch(
            store.clone(),
            &AppConfig::default(),
            &Renderer::plain(),
            || 100_u64,
            command,
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_toggle_list_delete() {
        let store = MemoryStore::new();

        let printed = run(
            &store,
            Command::Add {
                text: vec!["Buy".to_string(), "milk".to_string()],
            },
        );
        assert_eq!(printed, "100\n");

        let printed = run(&store, Command::Toggle { id: TaskId(100) });
        assert_eq!(printed, "task 100 is now completed\n");

        let printed = run(
            &store,
            Command::List {
                filter: FilterMode::Active,
            },
        );
        assert!(printed.starts_with("no active tasks\n"));
        assert!(printed.ends_with("1 tasks (0 active, 1 completed)\n"));

        let printed = run(
            &store,
            Command::List {
                filter: FilterMode::Completed,
            },
        );
        assert!(printed.contains("[x]  Buy milk"));

        let printed = run(&store, Command::Delete { id: TaskId(100) });
        assert_eq!(printed, "deleted task 100\n");
        assert_eq!(store.get_item("tasks").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn ignored_input_is_reported_not_failed() {
        let store = MemoryStore::new();

        let printed = run(
            &store,
            Command::Add {
                text: vec!["  ".to_string()],
            },
        );
        assert_eq!(printed, "nothing to add: task text is blank\n");

        let printed = run(&store, Command::Delete { id: TaskId(9) });
        assert_eq!(printed, "no task with id 9\n");
        assert!(store.is_empty());
    }

    #[test]
    fn theme_actions_write_slot() {
        let store = MemoryStore::new();
        assert_eq!(
            run(
                &store,
                Command::Theme {
                    action: ThemeAction::Show
                }
            ),
            "theme: light\n"
        );
        assert_eq!(
            run(
                &store,
                Command::Theme {
                    action: ThemeAction::Toggle
                }
            ),
            "theme: dark\n"
        );
        assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("dark"));
    }
}
