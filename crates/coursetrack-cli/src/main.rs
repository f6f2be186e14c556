// coursetrack CLI entry point

use anyhow::Context;
use clap::Parser;

use coursetrack_cli::{output, Cli, CommandRouter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands run their port calls one after another; one thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    if let Err(e) = runtime.block_on(CommandRouter::run(&cli)) {
        output::print_error(&e.user_message());
        if cli.verbose {
            eprintln!("{}", e.technical_details());
        }
        std::process::exit(1);
    }
    Ok(())
}
