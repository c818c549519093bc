use std::path::PathBuf;
use std::process;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "solguard",
    version,
    about = "Harden Solidity contracts against delegatecall storage clobbering"
)]
struct Cli {
    /// Compiler AST export (JSON) to analyze
    #[arg(short, long)]
    input: PathBuf,
    /// Directory the regenerated source is written under
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
    /// Protected state-variable names, tried in order
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "owner,_owner,owner_"
    )]
    variables: Vec<String>,
    /// Also emit the call graph as DOT text
    #[arg(long)]
    call_graph: bool,
}

fn main() {
    let cli = Cli::parse();
    process::exit(solguard::cli::run(
        &cli.input,
        &cli.output,
        cli.variables,
        cli.call_graph,
    ));
}
