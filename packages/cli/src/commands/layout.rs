use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mindloom_layout::{layout_document, LayoutConfig, ViewEdgeKind};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Saved document (.json)
    pub path: PathBuf,

    /// Emit the positioned view as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Gap between a parent and its children column
    #[arg(long, default_value = "40")]
    pub horizontal_gap: f64,

    /// Gap between sibling subtrees
    #[arg(long, default_value = "20")]
    pub vertical_gap: f64,
}

pub fn layout(args: LayoutArgs) -> Result<()> {
    let doc = super::load_document(&args.path)?;

    let config = LayoutConfig {
        horizontal_gap: args.horizontal_gap,
        vertical_gap: args.vertical_gap,
        ..LayoutConfig::default()
    };
    let view = layout_document(&doc, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{} {} nodes, {} edges",
        "Layout".bright_blue().bold(),
        view.nodes.len(),
        view.edges.len()
    );
    println!();

    for node in &view.nodes {
        println!(
            "  {:>8.1} {:>8.1}  {:>6.1}×{:<6.1}  {}",
            node.x,
            node.y,
            node.width,
            node.height,
            node.id.as_str().cyan()
        );
    }

    let links = view
        .edges
        .iter()
        .filter(|e| e.kind == ViewEdgeKind::Link)
        .count();
    println!();
    println!(
        "  {} tree connectors, {} manual links",
        view.edges.len() - links,
        links
    );

    Ok(())
}
