//! suml CLI - Turn yUML-style shorthand into diagrams

mod cli;
mod external;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();
    let app = cli::SumlApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
