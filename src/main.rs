use clap::Parser;
use colored::Colorize;
use orgmap::cmd;

#[derive(Parser, Debug)]
#[command(
    name = "orgmap",
    about = "Render your Microsoft 365 organization as markmap outlines",
    version,
    long_about = "Fetches every user from Microsoft Graph and writes four markmap documents:\n\
                  Users.md (manager chain), Departments.md, JobTitles.md and OfficeLocations.md.\n\n\
                  Authenticate with a bearer token:\n  \
                  orgmap <token> <output-dir>\n\
                  or with an app registration (User.Read.All application permission):\n  \
                  orgmap <tenant-id> <client-id> <client-secret> <output-dir>"
)]
struct Cli {
    #[command(flatten)]
    generate: cmd::generate::GenerateArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> orgmap::error::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("orgmap=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    cmd::generate::generate(cli.generate).await
}
