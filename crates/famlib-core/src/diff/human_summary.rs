//! Human-readable changelog renderer for change sets.

use crate::diff::model::{ChangeItem, ChangeKind, ChangeSet, ScalarChange};

/// Render a deterministic Markdown-style changelog for a [`ChangeSet`].
///
/// Informational only; the structured change set stays authoritative.
pub fn render_changelog(changes: &ChangeSet) -> String {
    if !changes.has_changes() {
        return "_No changes._\n".to_string();
    }

    let mut out = String::new();
    for item in &changes.items {
        match item {
            ChangeItem::Name(change) => scalar_line(&mut out, "Name", change),
            ChangeItem::Category(change) => scalar_line(&mut out, "Category", change),
            ChangeItem::Types { added, removed } => {
                out.push_str("### Types\n\n");
                if !added.is_empty() {
                    out.push_str(&format!("- **Added** ({}): {}\n", added.len(), added.join(", ")));
                }
                if !removed.is_empty() {
                    out.push_str(&format!(
                        "- **Removed** ({}): {}\n",
                        removed.len(),
                        removed.join(", ")
                    ));
                }
                out.push('\n');
            }
            ChangeItem::Parameters { changes } => {
                out.push_str("### Parameters\n\n");
                for change in changes {
                    let previous = change.previous.as_deref().unwrap_or("");
                    let current = change.current.as_deref().unwrap_or("");
                    let line = match change.kind {
                        ChangeKind::Added => format!("- `{}` added: `{}`\n", change.name, current),
                        ChangeKind::Changed => format!(
                            "- `{}` changed: `{}` → `{}`\n",
                            change.name, previous, current
                        ),
                        ChangeKind::Removed => {
                            format!("- `{}` removed (was `{}`)\n", change.name, previous)
                        }
                    };
                    out.push_str(&line);
                }
                out.push('\n');
            }
            ChangeItem::Geometry { .. } => {
                out.push_str("### Geometry\n\n- Geometry changed\n\n");
            }
            ChangeItem::AuxText(change) => {
                out.push_str("### Auxiliary Text\n\n");
                let line = match change.kind {
                    ChangeKind::Added => "- Text added\n",
                    ChangeKind::Changed => "- Text changed\n",
                    ChangeKind::Removed => "- Text removed\n",
                };
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

fn scalar_line(out: &mut String, label: &str, change: &ScalarChange) {
    let previous = change.previous.as_deref().unwrap_or("");
    let current = change.current.as_deref().unwrap_or("");
    out.push_str(&format!("### {}\n\n", label));
    match change.kind {
        ChangeKind::Added => out.push_str(&format!("- Set to `{}`\n\n", current)),
        ChangeKind::Changed => {
            out.push_str(&format!("- `{}` → `{}`\n\n", previous, current));
        }
        ChangeKind::Removed => out.push_str(&format!("- Cleared (was `{}`)\n\n", previous)),
    }
}
