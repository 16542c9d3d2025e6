use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mindloom_document::{Document, NodeId, NodePayload};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Saved document (.json)
    pub path: PathBuf,
}

pub fn inspect(args: InspectArgs) -> Result<()> {
    let doc = super::load_document(&args.path)?;

    println!(
        "{} {}",
        "Document".bright_blue().bold(),
        args.path.display()
    );
    println!();

    for root in &doc.roots {
        print_tree(&doc, root, 0);
    }

    if !doc.edges.is_empty() {
        println!();
        println!("{}", "Links".bright_blue().bold());
        for edge in &doc.edges {
            let label = edge.label.as_deref().unwrap_or("-");
            println!(
                "  {} {} {} ({})",
                edge.source.as_str().cyan(),
                "→".dimmed(),
                edge.target.as_str().cyan(),
                label
            );
        }
    }

    Ok(())
}

/// Iterative depth-first print of one root's subtree
fn print_tree(doc: &Document, root: &NodeId, indent: usize) {
    let mut stack = vec![(root.clone(), indent)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = doc.get(&id) else {
            continue;
        };

        let marker = if node.is_root() { "◉" } else { "○" };
        println!(
            "{}{} {} {}",
            "  ".repeat(depth),
            marker.green(),
            summary(&node.payload),
            format!("[{}]", id).as_str().dimmed()
        );

        for child in node.children.iter().rev() {
            stack.push((child.clone(), depth + 1));
        }
    }
}

fn summary(payload: &NodePayload) -> String {
    match payload {
        NodePayload::Text { text } => {
            if text.is_empty() {
                "(empty)".to_string()
            } else {
                text.clone()
            }
        }
        NodePayload::Image { src, .. } => format!("image: {}", src),
        NodePayload::Link { url, title, .. } => match title {
            Some(title) => format!("{} ({})", title, url),
            None => url.clone(),
        },
    }
}
