use crate::cmd::progress;
use crate::config::{Config, ConfigManager, OfficeLayout};
use crate::error::{OrgmapError, Result};
use crate::graph::auth::{Credentials, TokenProvider};
use crate::graph::users::{self, UserQuery};
use crate::graph::GraphClient;
use crate::report;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

const USAGE: &str = "expected <token> <output-dir> \
                     or <tenant-id> <client-id> <client-secret> <output-dir>";

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// <token> <output-dir>, or <tenant-id> <client-id> <client-secret> <output-dir>
    #[arg(value_name = "ARGS", num_args = 0.., allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Configuration file (defaults to config.toml in the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Layout of the office locations report
    #[arg(long, value_enum)]
    pub layout: Option<OfficeLayout>,
}

/// Validated positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub credentials: Credentials,
    pub output_dir: PathBuf,
}

impl Invocation {
    /// Accepts exactly two or exactly four arguments
    pub fn parse(args: &[String]) -> Result<Self> {
        let invocation = match args {
            [token, output_dir] => Self {
                credentials: Credentials::Token(token.clone()),
                output_dir: PathBuf::from(output_dir),
            },
            [tenant_id, client_id, client_secret, output_dir] => Self {
                credentials: Credentials::ClientSecret {
                    tenant_id: tenant_id.clone(),
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                },
                output_dir: PathBuf::from(output_dir),
            },
            _ => {
                return Err(OrgmapError::InvalidArguments(format!(
                    "{}, got {} argument(s)",
                    USAGE,
                    args.len()
                )));
            }
        };

        if let Some(pos) = args.iter().position(|a| a.trim().is_empty()) {
            return Err(OrgmapError::InvalidArguments(format!(
                "argument {} is empty",
                pos + 1
            )));
        }

        Ok(invocation)
    }
}

pub async fn generate(args: GenerateArgs) -> Result<()> {
    // Arity is checked before any config or network access
    let invocation = Invocation::parse(&args.args)?;

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_file(path),
        None => ConfigManager::new()?,
    };
    let mut config = config_manager.load_config()?;
    if let Some(layout) = args.layout {
        config.office_layout = layout;
    }

    let written = run(invocation, &config).await?;

    for path in &written {
        println!("{} {}", "✓".green(), path.display());
    }
    println!(
        "\n{} {} report(s) written",
        "→".cyan(),
        written.len().to_string().bold()
    );

    Ok(())
}

/// Fetch the directory and write every report
pub async fn run(invocation: Invocation, config: &Config) -> Result<Vec<PathBuf>> {
    let tokens = TokenProvider::from_credentials(invocation.credentials, config)?;
    let client = GraphClient::new(tokens, config)?;
    let query = UserQuery::from_config(config);

    let spinner = progress::create_spinner("Fetching users...");
    let fetched = users::fetch_all_users_with_progress(&client, &query, |count| {
        spinner.set_message(format!("Fetching users... {}", count));
    })
    .await;

    let users = match fetched {
        Ok(users) => {
            progress::finish_spinner_success(&spinner, &format!("Fetched {} users", users.len()));
            users
        }
        Err(e) => {
            progress::finish_spinner_error(&spinner, "Failed to fetch users");
            return Err(e);
        }
    };

    report::write_all(&invocation.output_dir, &users, config.office_layout)
}
