// src/cli/display.rs

use crate::domain::node::BookmarkNode;
use crate::domain::reconciliation::ReconciliationResult;
use crossterm::style::Stylize;
use itertools::Itertools;

/// Plain text report of one pass, the same facts the browser popup shows
pub fn format_result(result: &ReconciliationResult) -> String {
    if !result.success {
        return format!(
            "Organization failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    [
        format!("Initial total: {}", result.before),
        format!(
            "Duplicates removed: {} ({:.2}%)",
            result.removed,
            result.reduction_percent()
        ),
        format!("Folders merged: {}", result.merged_folders),
        format!("Current total: {}", result.after),
    ]
    .iter()
    .join("\n")
}

/// One line summary used by `watch`
pub fn summary_line(result: &ReconciliationResult) -> String {
    if result.success {
        format!(
            "{} bookmarks, {} duplicates removed, {} folders merged",
            result.after, result.removed, result.merged_folders
        )
    } else {
        format!(
            "failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}

pub fn print_result(result: &ReconciliationResult, dry_run: bool, no_color: bool) {
    let header = match (result.success, dry_run) {
        (true, true) => "Organization complete (dry run, nothing saved)",
        (true, false) => "Organization complete",
        (false, _) => "Organization failed",
    };
    if no_color {
        println!("{}", header);
    } else if result.success {
        println!("{}", header.green().bold());
    } else {
        println!("{}", header.red().bold());
    }
    if result.success {
        println!("{}", format_result(result));
    }
}

/// Indented outline of the tree, folders marked with a trailing slash
pub fn render_tree(tree: &[BookmarkNode]) -> String {
    let mut lines = Vec::new();
    // (node, depth), children pushed in reverse to keep order
    let mut stack: Vec<(&BookmarkNode, usize)> = tree.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        if node.is_root() {
            stack.extend(node.child_nodes().iter().rev().map(|c| (c, depth)));
            continue;
        }
        let indent = "  ".repeat(depth);
        match &node.url {
            Some(url) => lines.push(format!("{}{} <{}>", indent, node.title, url)),
            None => lines.push(format!("{}{}/", indent, node.title)),
        }
        stack.extend(node.child_nodes().iter().rev().map(|c| (c, depth + 1)));
    }
    lines.join("\n")
}

pub fn print_error(message: &str, no_color: bool) {
    if no_color {
        eprintln!("{}", message);
    } else {
        eprintln!("{}", message.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_success_when_formatting_then_reports_counts_and_percentage() {
        let text = format_result(&ReconciliationResult::succeeded(4, 3, 1, 0));

        assert_eq!(
            text,
            "Initial total: 4\nDuplicates removed: 1 (25.00%)\nFolders merged: 0\nCurrent total: 3"
        );
    }

    #[test]
    fn given_empty_tree_when_formatting_then_percentage_is_zero() {
        let text = format_result(&ReconciliationResult::succeeded(0, 0, 0, 0));
        assert!(text.contains("Duplicates removed: 0 (0.00%)"));
    }

    #[test]
    fn given_failure_when_formatting_then_shows_error() {
        let result = ReconciliationResult::failed("Store unavailable: gone");
        assert_eq!(
            format_result(&result),
            "Organization failed: Store unavailable: gone"
        );
        assert_eq!(summary_line(&result), "failed: Store unavailable: gone");
    }

    #[test]
    fn given_tree_when_rendering_then_indents_by_depth() {
        let tree = vec![BookmarkNode::folder(
            "0",
            "",
            vec![BookmarkNode::folder(
                "1",
                "Bookmarks Bar",
                vec![
                    BookmarkNode::folder(
                        "3",
                        "Rust",
                        vec![BookmarkNode::bookmark("4", "Book", "https://rust.example")],
                    ),
                    BookmarkNode::bookmark("5", "News", "https://news.example"),
                ],
            )],
        )];

        let rendered = render_tree(&tree);

        assert_eq!(
            rendered,
            "Bookmarks Bar/\n  Rust/\n    Book <https://rust.example>\n  News <https://news.example>"
        );
    }
}
