use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a puzzle from a local JSON file and write a `.result` file
    Solve(cmd::solve::SolveArgs),
    /// Solve the same puzzle repeatedly and report score statistics
    Bench(cmd::bench::BenchArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Solve(args) => cmd::solve::run(args),
        Commands::Bench(args) => cmd::bench::run(args),
    }
}
