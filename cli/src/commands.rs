//! Subcommands that run without the landing screen.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use anora_config::{
    AnoraConfig, ConfigError, ENDPOINT_ENV_VAR, EndpointSource, ResolvedEndpoint, config_path,
    persist_endpoint, resolve_endpoint,
};
use anora_engine::{ConvexClient, WaitlistBackend};
use anora_types::{NonEmptyString, Signup, WaitlistEntry};

use crate::args::{Command, ConfigCommand, WaitlistCommand};

pub async fn run(command: Command, config: Option<&AnoraConfig>) -> Result<()> {
    let mut out = std::io::stdout();
    match command {
        Command::Waitlist(command) => {
            let client = waitlist_client(config)?;
            run_waitlist(command, &client, &mut out).await
        }
        Command::Config(command) => {
            let endpoint = resolve_endpoint(config);
            run_config(command, config_path().as_deref(), &endpoint, &mut out)
        }
    }
}

fn waitlist_client(config: Option<&AnoraConfig>) -> Result<ConvexClient> {
    let endpoint = resolve_endpoint(config);
    if !endpoint.is_configured() {
        bail!(
            "no waitlist endpoint configured; set {ENDPOINT_ENV_VAR} or run \
             `anora config set-endpoint <url>`"
        );
    }
    let timeout = config.and_then(AnoraConfig::request_timeout);
    tracing::debug!(endpoint = %endpoint.url, source = %endpoint.source, "Waitlist endpoint");
    ConvexClient::new(endpoint.url.clone(), timeout)
        .with_context(|| format!("failed to create waitlist client for {}", endpoint.url))
}

pub async fn run_waitlist(
    command: WaitlistCommand,
    backend: &dyn WaitlistBackend,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        WaitlistCommand::Add { name, email } => {
            let signup = Signup {
                name: NonEmptyString::new(&name).context("name must not be empty")?,
                email: NonEmptyString::new(&email).context("email must not be empty")?,
            };
            let id = backend
                .add(signup)
                .await
                .with_context(|| format!("failed to add signup via {}", backend.describe()))?;
            writeln!(out, "{id}")?;
        }
        WaitlistCommand::List => {
            let entries = backend
                .list()
                .await
                .with_context(|| format!("failed to list signups via {}", backend.describe()))?;
            for entry in &entries {
                writeln!(out, "{}", format_entry(entry))?;
            }
        }
        WaitlistCommand::Count => {
            let count = backend
                .count()
                .await
                .with_context(|| format!("failed to count signups via {}", backend.describe()))?;
            writeln!(out, "{count}")?;
        }
    }
    Ok(())
}

pub fn run_config(
    command: ConfigCommand,
    path: Option<&Path>,
    endpoint: &ResolvedEndpoint,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let path = path.map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
            writeln!(out, "config:   {path}")?;
            if endpoint.is_configured() {
                writeln!(out, "endpoint: {} ({})", endpoint.url, endpoint.source)?;
            } else {
                writeln!(out, "endpoint: (unset, signups are only logged)")?;
            }
        }
        ConfigCommand::SetEndpoint { url } => {
            let path: PathBuf = path.map(Path::to_path_buf).ok_or(ConfigError::NoPath)?;
            let saved = persist_endpoint(&path, &url)?;
            writeln!(out, "Saved endpoint {saved} to {}", path.display())?;
            if endpoint.source == EndpointSource::Environment {
                writeln!(
                    out,
                    "note: {ENDPOINT_ENV_VAR} is set and takes precedence over the config file"
                )?;
            }
        }
    }
    Ok(())
}

fn format_entry(entry: &WaitlistEntry) -> String {
    let when = chrono::DateTime::from_timestamp_millis(entry.created_at).map_or_else(
        || entry.created_at.to_string(),
        |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    format!("{when}  {} <{}>  {}", entry.name, entry.email, entry.id)
}

#[cfg(test)]
mod tests {
    use anora_config::{EndpointSource, ResolvedEndpoint};
    use anora_engine::MemoryWaitlist;
    use anora_types::{EntryId, WaitlistEntry};

    use super::{format_entry, run_config, run_waitlist};
    use crate::args::{ConfigCommand, WaitlistCommand};

    fn add(name: &str, email: &str) -> WaitlistCommand {
        WaitlistCommand::Add {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn unset() -> ResolvedEndpoint {
        ResolvedEndpoint {
            url: String::new(),
            source: EndpointSource::Unset,
        }
    }

    async fn output(command: WaitlistCommand, backend: &MemoryWaitlist) -> String {
        let mut out = Vec::new();
        run_waitlist(command, backend, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn add_prints_the_same_id_for_a_repeated_email() {
        let backend = MemoryWaitlist::new();
        let first = output(add("Ada", "ada@example.com"), &backend).await;
        let second = output(add("Ada L.", "ada@example.com"), &backend).await;
        assert_eq!(first, second);
        assert_eq!(output(WaitlistCommand::Count, &backend).await, "1\n");
    }

    #[tokio::test]
    async fn list_prints_newest_first() {
        let backend = MemoryWaitlist::new();
        output(add("Ada", "ada@example.com"), &backend).await;
        output(add("Grace", "grace@example.com"), &backend).await;

        let listing = output(WaitlistCommand::List, &backend).await;
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Grace <grace@example.com>"));
        assert!(lines[1].contains("Ada <ada@example.com>"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_any_call() {
        let backend = MemoryWaitlist::new();
        let mut out = Vec::new();
        let err = run_waitlist(add("  ", "ada@example.com"), &backend, &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
        assert!(backend.is_empty());
    }

    #[test]
    fn entry_line_shows_utc_time() {
        let entry = WaitlistEntry {
            id: EntryId::new("j57a2b"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at: 1_730_000_000_000,
        };
        assert_eq!(
            format_entry(&entry),
            "2024-10-27 03:33:20 UTC  Ada <ada@example.com>  j57a2b"
        );
    }

    #[test]
    fn show_reports_path_and_endpoint() {
        let endpoint = ResolvedEndpoint {
            url: "https://happy-animal-123.convex.cloud".to_string(),
            source: EndpointSource::ConfigFile,
        };
        let mut out = Vec::new();
        run_config(
            ConfigCommand::Show,
            Some(std::path::Path::new("/tmp/anora/config.toml")),
            &endpoint,
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("config:   /tmp/anora/config.toml"));
        assert!(text.contains("https://happy-animal-123.convex.cloud (config file)"));

        let mut out = Vec::new();
        run_config(ConfigCommand::Show, None, &unset(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("(unset"));
    }

    #[test]
    fn set_endpoint_writes_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut out = Vec::new();
        run_config(
            ConfigCommand::SetEndpoint {
                url: "https://happy-animal-123.convex.cloud/".to_string(),
            },
            Some(&path),
            &unset(),
            &mut out,
        )
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("convex_url = \"https://happy-animal-123.convex.cloud\""));
        assert!(
            String::from_utf8(out)
                .unwrap()
                .starts_with("Saved endpoint https://happy-animal-123.convex.cloud")
        );
    }

    #[test]
    fn set_endpoint_without_path_fails() {
        let mut out = Vec::new();
        let result = run_config(
            ConfigCommand::SetEndpoint {
                url: "https://happy-animal-123.convex.cloud".to_string(),
            },
            None,
            &unset(),
            &mut out,
        );
        assert!(result.is_err());
    }
}
