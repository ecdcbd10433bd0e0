use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::controller::TaskCounts;
use crate::task::Task;
use crate::theme::Theme;

const HEADERS: [&str; 3] = ["ID", "Done", "Text"];

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            color: io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, out, tasks), fields(count = tasks.len()))]
    pub fn write_task_table<W: Write>(&self, mut out: W, tasks: &[&Task]) -> anyhow::Result<()> {
        let ids: Vec<String> = tasks.iter().map(|task| task.id.to_string()).collect();
        let widths = [
            column_width(HEADERS[0], ids.iter().map(String::as_str)),
            column_width(HEADERS[1], tasks.iter().map(|task| done_mark(task))),
            column_width(HEADERS[2], tasks.iter().map(|task| task.text.as_str())),
        ];

        for (header, width) in HEADERS.iter().zip(widths) {
            write_cell(&mut out, header, header, width)?;
        }
        writeln!(out)?;

        for width in widths {
            write!(out, "{:-<width$} ", "")?;
        }
        writeln!(out)?;

        for (task, id) in tasks.iter().zip(&ids) {
            let text = if task.completed {
                self.paint(&task.text, "9")
            } else {
                task.text.clone()
            };
            write_cell(&mut out, id, &self.paint(id, "33"), widths[0])?;
            write_cell(&mut out, done_mark(task), done_mark(task), widths[1])?;
            write_cell(&mut out, &task.text, &text, widths[2])?;
            writeln!(out)?;
        }

        Ok(())
    }

    pub fn write_counts<W: Write>(&self, mut out: W, counts: TaskCounts) -> anyhow::Result<()> {
        writeln!(
            out,
            "{} tasks ({} active, {} completed)",
            counts.total, counts.active, counts.completed
        )?;
        Ok(())
    }

    pub fn write_theme<W: Write>(&self, mut out: W, theme: Theme) -> anyhow::Result<()> {
        writeln!(out, "theme: {theme}")?;
        Ok(())
    }

    pub fn write_notice<W: Write>(&self, mut out: W, message: &str) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(message, "2"))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn done_mark(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(UnicodeWidthStr::width).fold(UnicodeWidthStr::width(header), usize::max)
}

/// Pads by the display width of `visible`; `painted` may carry color escapes.
fn write_cell<W: Write>(out: &mut W, visible: &str, painted: &str, width: usize) -> io::Result<()> {
    let padding = width.saturating_sub(UnicodeWidthStr::width(visible));
    write!(out, "{painted}{} ", " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;

    #[test]
    fn table_aligns_wide_text() {
        let a = Task::new(TaskId(7), "寿司を買う".to_string());
        let mut b = Task::new(TaskId(1234), "ship".to_string());
        b.completed = true;

        let mut out = Vec::new();
        Renderer::plain()
            .write_task_table(&mut out, &[&a, &b])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID   Done Text       ");
        assert_eq!(lines[1], "---- ---- ---------- ");
        assert_eq!(lines[2], "7    [ ]  寿司を買う ");
        assert_eq!(lines[3], "1234 [x]  ship       ");
    }

    #[test]
    fn color_escapes_do_not_shift_columns() {
        let task = Task::new(TaskId(7), "tea".to_string());

        let mut out = Vec::new();
        Renderer { color: true }
            .write_task_table(&mut out, &[&task])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID Done Text ");
        assert_eq!(lines[2], "\x1b[33m7\x1b[0m  [ ]  tea  ");
    }
}
