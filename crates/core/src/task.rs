//! Markdown checklist rendering for extracted tasks.

/// Marker placed between a task and its due date (U+23F3, hourglass).
pub const DUE_MARKER: char = '\u{23F3}';

/// Format a task as an unchecked Markdown checklist item.
///
/// ```
/// use datemark_core::format_task;
///
/// assert_eq!(format_task(" call mom ", Some("2026-10-20")), "- [ ] call mom \u{23F3} 2026-10-20");
/// assert_eq!(format_task("buy milk", None), "- [ ] buy milk");
/// ```
#[must_use]
pub fn format_task(content: &str, due: Option<&str>) -> String {
    let task = content.trim();
    match due {
        Some(date) => format!("- [ ] {} {} {}", task, DUE_MARKER, date),
        None => format!("- [ ] {}", task),
    }
}
