//! Entry point for the command-line interface.

use wpsec::args::{parse_cli, Commands};
use wpsec::scan::{list_rules, print_tokens, run_scan};

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Rules(args) => list_rules(args),
        Commands::Tokens(args) => print_tokens(args),
    }
}
