mod cli;

use artifact_gate::adapters::outbound::store::JsonFileMetadataStore;
use artifact_gate::application::dto::ArtifactEvent;
use artifact_gate::application::factories::GateFactory;
use artifact_gate::config::{discover_config, load_config_from_path, ConfigFile, GateSettings};
use artifact_gate::gate::domain::{Decision, PackageManager};
use artifact_gate::logging::init_tracing;
use artifact_gate::ports::inbound::ArtifactGatePort;
use artifact_gate::ports::outbound::RiskRepository;
use artifact_gate::shared::{ExitCode, GateError, Result};
use cli::{Args, Command};
use owo_colors::OwoColorize;
use std::path::Path;
use std::process;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    if let Err(e) = init_tracing(&args.log_level, args.log_format) {
        eprintln!("{} {}", "warning:".yellow(), e);
    }

    let exit_code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(exit_code.as_i32());
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let settings = GateSettings::from_config(&config)?;

    match args.command {
        Command::Resolve {
            package_manager,
            path,
            layout,
        } => {
            let resolver = GateFactory::create_resolver(&settings)?;
            let coordinate = resolver
                .resolve(&path, &layout.unwrap_or_default(), package_manager)
                .await;
            println!("{}", serde_json::to_string_pretty(&coordinate)?);
            Ok(ExitCode::Success)
        }
        Command::Check {
            package_manager,
            path,
            locations,
            layout,
            store,
            timeout,
        } => {
            let store = JsonFileMetadataStore::open(store)?;
            let gate = GateFactory::create(&settings, store).await?;

            let locations = if locations.is_empty() {
                vec![path.clone()]
            } else {
                locations
            };
            let event = ArtifactEvent::new(path, package_manager, layout.unwrap_or_default(), locations);

            let cancel = CancellationToken::new();
            if let Some(seconds) = timeout {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(seconds)).await;
                    cancel.cancel();
                });
            }

            let decision = gate.before_download(&event, cancel).await;
            println!("{}", serde_json::to_string_pretty(&decision)?);
            Ok(exit_code_for(&decision))
        }
        Command::Vulnerabilities {
            package_manager,
            name,
            version,
        } => print_vulnerabilities(&settings, package_manager, &name, &version).await,
    }
}

fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_config_from_path(path),
        None => Ok(discover_config(Path::new("."))?.unwrap_or_default()),
    }
}

fn exit_code_for(decision: &Decision) -> ExitCode {
    match decision {
        Decision::Allow => ExitCode::Success,
        Decision::Block(violation) => {
            eprintln!("{} {}", "⛔".red(), violation.message.red());
            ExitCode::PolicyViolation
        }
    }
}

async fn print_vulnerabilities(
    settings: &GateSettings,
    package_manager: PackageManager,
    name: &str,
    version: &str,
) -> Result<ExitCode> {
    let client = GateFactory::create_risk_client(settings).await?;
    if !client.is_authenticated() {
        return Err(GateError::UserNotAuthenticated.into());
    }

    let Some(package_type) = package_manager.package_type() else {
        return Err(GateError::CoordinateInvalid {
            package_type: package_manager.key().to_string(),
            name: Some(name.to_string()),
            version: Some(version.to_string()),
        }
        .into());
    };

    let info = client.get_artifact_info(package_type, name, version).await?;
    let identifier = info
        .id()
        .ok_or_else(|| anyhow::anyhow!("The risk API returned no identifier for {}@{}", name, version))?;
    let vulnerabilities = client.get_vulnerabilities(identifier).await?;

    println!("{}", serde_json::to_string_pretty(&vulnerabilities)?);
    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_gate::gate::domain::PolicyViolation;

    #[test]
    fn test_exit_code_for_decision() {
        assert_eq!(exit_code_for(&Decision::Allow), ExitCode::Success);
        assert_eq!(
            exit_code_for(&Decision::Block(PolicyViolation::license("x"))),
            ExitCode::PolicyViolation
        );
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let config = load_config(Some(Path::new("/nonexistent/artifact-gate.config.yml")));
        assert!(config.is_err());
    }
}
