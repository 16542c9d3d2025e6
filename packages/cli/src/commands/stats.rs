use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mindloom_document::{Document, NodePayload};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Saved document (.json)
    pub path: PathBuf,
}

pub fn stats(args: StatsArgs) -> Result<()> {
    let doc = super::load_document(&args.path)?;

    let mut text = 0usize;
    let mut images = 0usize;
    let mut links = 0usize;
    for node in doc.nodes.values() {
        match node.payload {
            NodePayload::Text { .. } => text += 1,
            NodePayload::Image { .. } => images += 1,
            NodePayload::Link { .. } => links += 1,
        }
    }

    println!("{} {}", "Stats".bright_blue().bold(), args.path.display());
    println!("  nodes:       {}", doc.nodes.len());
    println!("    text:      {}", text);
    println!("    images:    {}", images);
    println!("    links:     {}", links);
    println!("  roots:       {}", doc.roots.len());
    println!("  cross-links: {}", doc.edges.len());
    println!("  max depth:   {}", max_depth(&doc));

    Ok(())
}

/// Deepest attachment chain across all roots (iterative)
fn max_depth(doc: &Document) -> usize {
    let mut deepest = 0usize;
    let mut stack: Vec<(_, usize)> = doc.roots.iter().map(|r| (r.clone(), 1)).collect();

    while let Some((id, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        if let Some(node) = doc.get(&id) {
            for child in &node.children {
                stack.push((child.clone(), depth + 1));
            }
        }
    }

    deepest
}
