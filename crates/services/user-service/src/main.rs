//! User Service - administrative CLI for user accounts and roles.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::{AppError, AppResult};
use domain::{User, UserCredentials};
use user_service_lib::config::UserServiceConfig;
use user_service_lib::service::UserService;
use user_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User account administration")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// User account commands
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// List the role reference data
    Roles,
    /// Check database connectivity
    Ping,
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(long)]
    username: String,
    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    password: String,
}

impl From<CredentialArgs> for UserCredentials {
    fn from(args: CredentialArgs) -> Self {
        UserCredentials::new(args.username, args.password)
    }
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List,
    /// Create a user (with the default role unless --without-role)
    Create {
        #[command(flatten)]
        credentials: CredentialArgs,
        /// Skip the default role assignment
        #[arg(long)]
        without_role: bool,
    },
    /// Show a single user
    Show {
        #[arg(long, conflicts_with = "username", required_unless_present = "username")]
        id: Option<i32>,
        #[arg(long)]
        username: Option<String>,
    },
    /// List role names assigned to a user
    Roles {
        #[arg(long)]
        id: i32,
    },
    /// Bind a user to the default role
    AssignDefaultRole {
        #[arg(long)]
        id: i32,
    },
    /// Change a user's password
    Passwd {
        #[arg(long)]
        id: i32,
        #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Overwrite a user's username and password
    Update {
        #[arg(long)]
        id: i32,
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Delete a user and its role assignments
    Delete {
        #[arg(long)]
        id: i32,
    },
    /// Check a username/password pair
    Verify {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = UserServiceConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {}", e.code(), e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &UserServiceConfig) -> AppResult<()> {
    match command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            user_service_lib::run_migrations(config, migrate_action).await?;
        }
        Commands::Users { action } => {
            let service = user_service_lib::connect(config).await?;
            run_user_command(service.as_ref(), action).await?;
        }
        Commands::Roles => {
            let service = user_service_lib::connect(config).await?;
            for role in service.list_roles().await? {
                println!("{}\t{}", role.id, role.name);
            }
        }
        Commands::Ping => {
            user_service_lib::ping(config).await?;
        }
    }

    Ok(())
}

async fn run_user_command(service: &dyn UserService, action: UserCommands) -> AppResult<()> {
    match action {
        UserCommands::List => {
            for user in service.list_users().await? {
                print_user(&user);
            }
        }
        UserCommands::Create {
            credentials,
            without_role,
        } => {
            let created = if without_role {
                service.create_user(credentials.into()).await?
            } else {
                service.register_user(credentials.into()).await?
            };
            println!("{}\t{}", created.id, created.username);
        }
        UserCommands::Show { id, username } => {
            let user = match (id, username) {
                (Some(id), _) => service.get_user(id).await?,
                (None, Some(username)) => service.get_user_by_username(&username).await?,
                (None, None) => {
                    return Err(AppError::validation("either --id or --username is required"))
                }
            };
            print_user(&user);
        }
        UserCommands::Roles { id } => {
            for role in service.get_user_roles(id).await? {
                println!("{}", role);
            }
        }
        UserCommands::AssignDefaultRole { id } => {
            service.assign_default_role(id).await?;
        }
        UserCommands::Passwd { id, password } => {
            service.change_password(id, &password).await?;
        }
        UserCommands::Update { id, credentials } => {
            service.admin_update_user(id, credentials.into()).await?;
        }
        UserCommands::Delete { id } => {
            service.delete_user(id).await?;
        }
        UserCommands::Verify { credentials } => {
            let user = service
                .authenticate(&credentials.username, &credentials.password)
                .await?;
            println!("ok\t{}", user.id);
        }
    }

    Ok(())
}

fn print_user(user: &User) {
    println!("{}\t{}", user.id, user.username);
}

/// Initialize tracing subscriber (verbose mode sets debug level)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("user-service").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_rejects_both_id_and_username() {
        let err = parse(&["users", "show", "--id", "1", "--username", "alice"])
            .err()
            .unwrap();

        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_show_requires_id_or_username() {
        let err = parse(&["users", "show"]).err().unwrap();

        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_show_by_username() {
        let cli = parse(&["users", "show", "--username", "alice"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Users {
                action: UserCommands::Show { id: None, username: Some(ref u) }
            } if u == "alice"
        ));
    }

    #[test]
    fn test_create_without_role_and_global_verbose() {
        let cli = parse(&[
            "users",
            "create",
            "--username",
            "alice",
            "--password",
            "secret",
            "--without-role",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Users {
            action: UserCommands::Create { credentials, without_role },
        } = cli.command
        else {
            panic!("expected users create");
        };
        assert!(without_role);
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn test_migrate_requires_action() {
        assert!(parse(&["migrate"]).is_err());
        assert!(matches!(
            parse(&["migrate", "status"]).unwrap().command,
            Commands::Migrate { action: MigrateCommands::Status }
        ));
    }
}
