//! `eudai-tasks list` command.

use std::fmt::Write as _;

use crate::tasks::TaskKind;

/// Execute the `list` command.
///
/// # Errors
///
/// Never fails; returns `Result` for dispatch uniformity.
pub fn run() -> Result<(), String> {
    print!("{}", render());
    Ok(())
}

/// Renders the task table. Default tasks are marked with `*`.
#[must_use]
pub fn render() -> String {
    let width = TaskKind::ALL.iter().map(|k| k.name().len()).max().unwrap_or(0);
    let mut out = String::from("Tasks (* runs by default):\n");
    for kind in TaskKind::ALL {
        let marker = if kind.is_default() { '*' } else { '-' };
        let _ = write!(out, "{marker} {:<width$}  {}", kind.name(), kind.description());
        if !kind.aliases().is_empty() {
            let _ = write!(out, " (aliases: {})", kind.aliases().join(", "));
        }
        out.push('\n');
    }
    out
}
