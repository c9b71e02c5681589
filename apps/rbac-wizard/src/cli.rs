use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "rbac-wizard",
    about = "Visualize and preview Kubernetes and Rancher RBAC bindings",
    version
)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the API server and, when configured, the web UI
    Serve {
        /// Port to run the server on (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the version information of rbac-wizard
    Version,
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version, build date and build commit, one per line.
#[must_use]
pub fn version_info() -> String {
    let build_date = option_env!("RBAC_WIZARD_BUILD_DATE").unwrap_or("unknown");
    let build_commit = option_env!("RBAC_WIZARD_BUILD_COMMIT").unwrap_or("unknown");
    format!(
        "RBAC Wizard version: {VERSION}\nBuild date: {build_date}\nBuild commit: {build_commit}"
    )
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_port_and_global_config() {
        let cli = Cli::try_parse_from(["rbac-wizard", "serve", "-p", "9090", "--config", "cfg.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cfg.yaml")));
        assert!(matches!(cli.command, Command::Serve { port: Some(9090) }));
    }

    #[test]
    fn serve_port_is_optional() {
        let cli = Cli::try_parse_from(["rbac-wizard", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { port: None }));
    }

    #[test]
    fn version_info_lists_three_lines() {
        let info = version_info();
        assert!(info.starts_with(&format!("RBAC Wizard version: {VERSION}\n")));
        assert_eq!(info.lines().count(), 3);
    }
}
