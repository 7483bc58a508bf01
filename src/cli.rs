use clap::{Parser, Subcommand};
use std::path::PathBuf;

use artifact_gate::gate::domain::{FileLayout, PackageManager, PhysicalLocation};
use artifact_gate::logging::LogFormat;

/// Download gate for binary package repositories
#[derive(Parser, Debug)]
#[command(name = "artifact-gate")]
#[command(version)]
#[command(about = "Resolve artifact coordinates, cache SCA risk data and enforce security/license policy", long_about = None)]
pub struct Args {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Path to a config file (defaults to artifact-gate.config.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the coordinate of a repository path and print it as JSON
    Resolve {
        /// Ecosystem of the repository (npm, pypi, maven, ...)
        #[arg(short = 'm', long)]
        package_manager: PackageManager,

        /// Path inside the repository, without the repository key
        #[arg(short, long)]
        path: String,

        /// Structured layout: organization:module:revision[:integration]
        #[arg(short, long)]
        layout: Option<FileLayout>,
    },

    /// Scan and gate a download against a JSON-file metadata store
    Check {
        /// Ecosystem of the repository (npm, pypi, maven, ...)
        #[arg(short = 'm', long)]
        package_manager: PackageManager,

        /// Requested artifact as repo/path
        #[arg(short, long)]
        path: PhysicalLocation,

        /// Physical location backing the requested path, as repo/path (repeatable; defaults to the requested path)
        #[arg(long = "location", value_name = "REPO/PATH")]
        locations: Vec<PhysicalLocation>,

        /// Structured layout: organization:module:revision[:integration]
        #[arg(short, long)]
        layout: Option<FileLayout>,

        /// JSON metadata store file (created when missing)
        #[arg(short, long)]
        store: PathBuf,

        /// Abort the remote stage after this many seconds
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,
    },

    /// Fetch the vulnerabilities of a package (requires credentials)
    Vulnerabilities {
        /// Ecosystem of the package (npm, pypi, maven, ...)
        #[arg(short = 'm', long)]
        package_manager: PackageManager,

        #[arg(short, long)]
        name: String,

        #[arg(short = 'v', long = "package-version")]
        version: String,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_locations() {
        let args = Args::try_parse_from([
            "artifact-gate",
            "check",
            "-m",
            "npm",
            "--path",
            "npm-virtual/lodash/-/lodash-0.2.1.tgz",
            "--location",
            "npm-remote/lodash/-/lodash-0.2.1.tgz",
            "--location",
            "npm-local/lodash/-/lodash-0.2.1.tgz",
            "--store",
            "store.json",
        ])
        .unwrap();

        match args.command {
            Command::Check {
                package_manager,
                path,
                locations,
                ..
            } => {
                assert_eq!(package_manager, PackageManager::Npm);
                assert_eq!(path.repo_key(), "npm-virtual");
                assert_eq!(locations.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_resolve_with_layout() {
        let args = Args::try_parse_from([
            "artifact-gate",
            "resolve",
            "-m",
            "maven",
            "--path",
            "org/slf4j/slf4j-api/1.7.30/slf4j-api-1.7.30.jar",
            "--layout",
            "org.slf4j:slf4j-api:1.7.30",
        ])
        .unwrap();

        match args.command {
            Command::Resolve { layout, .. } => assert!(layout.unwrap().is_valid()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_package_manager() {
        let result = Args::try_parse_from(["artifact-gate", "resolve", "-m", "cargo", "--path", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_log_flags() {
        let args = Args::try_parse_from([
            "artifact-gate",
            "--log-format",
            "json",
            "resolve",
            "-m",
            "npm",
            "--path",
            "a/-/a-1.0.0.tgz",
        ])
        .unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.log_level, "warn");
    }
}
