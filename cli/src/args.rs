//! Command-line arguments.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "anora", version)]
#[command(about = "Order your coffee via terminal. Join the waitlist.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Keep signups in memory instead of sending them to the waitlist backend
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Talk to the waitlist backend directly
    #[command(subcommand)]
    Waitlist(WaitlistCommand),
    /// Inspect or change the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum WaitlistCommand {
    /// Add (or refresh) a signup and print its id
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// List signups, newest first
    List,
    /// Print the number of signups
    Count,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the config path and the resolved waitlist endpoint
    Show,
    /// Save the waitlist endpoint to the config file
    SetEndpoint {
        /// Convex deployment URL, e.g. https://happy-animal-123.convex.cloud
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command, ConfigCommand, WaitlistCommand};

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_runs_the_landing_screen() {
        let cli = Cli::try_parse_from(["anora"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.offline);

        let cli = Cli::try_parse_from(["anora", "--offline"]).unwrap();
        assert!(cli.offline);
    }

    #[test]
    fn waitlist_add_takes_name_and_email() {
        let cli =
            Cli::try_parse_from(["anora", "waitlist", "add", "--name", "Ada", "--email", "a@b.c"])
                .unwrap();
        match cli.command {
            Some(Command::Waitlist(WaitlistCommand::Add { name, email })) => {
                assert_eq!(name, "Ada");
                assert_eq!(email, "a@b.c");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["anora", "waitlist", "add", "--name", "Ada"]).is_err());
    }

    #[test]
    fn config_set_endpoint_is_kebab_case() {
        let cli = Cli::try_parse_from([
            "anora",
            "config",
            "set-endpoint",
            "https://happy-animal-123.convex.cloud",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::SetEndpoint { .. }))
        ));
    }
}
