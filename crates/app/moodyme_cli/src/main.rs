// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod commands;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    logging::init(args.verbose)?;

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::SeedContent => commands::block_on(commands::seed_content())?,
        Commands::CreateAdmin(admin) => commands::block_on(commands::create_admin(admin))?,
        Commands::GrantAdmin { email } => commands::block_on(commands::grant_admin(email))?,
    }

    Ok(())
}
