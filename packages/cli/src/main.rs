mod commands;

use clap::{Parser, Subcommand};
use commands::{inspect, layout, stats, InspectArgs, LayoutArgs, StatsArgs};

/// Mindloom CLI - inspect and lay out canvas documents
#[derive(Parser, Debug)]
#[command(name = "mindloom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the node forest of a saved document
    Inspect(InspectArgs),

    /// Run the layout engine and emit the positioned view
    Layout(LayoutArgs),

    /// Summarize a saved document
    Stats(StatsArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Inspect(args) => inspect(args),
        Command::Layout(args) => layout(args),
        Command::Stats(args) => stats(args),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
