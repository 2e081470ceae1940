use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "moodyme", about = "MoodyMe admin operator commands", version)]
pub struct Cli {
    /// Debug output from the service libraries.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Create any missing well-known content documents.
    SeedContent,

    /// Create a new ADMIN account.
    CreateAdmin(CreateAdminArgs),

    /// Give an existing account the ADMIN role.
    GrantAdmin {
        #[arg(long)]
        email: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateAdminArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "Admin")]
    pub first_name: String,

    #[arg(long, default_value = "User")]
    pub last_name: String,

    /// Account password.
    #[arg(long, env = "MOODYME_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}
