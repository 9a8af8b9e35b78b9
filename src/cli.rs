//! Command-line interface for qagen
//!
//! Provides argument parsing and subcommand handling for the qagen binary.

use clap::{Parser, Subcommand};

/// Question/answer and free-form prompt generator backed by a hosted LLM
#[derive(Parser)]
#[command(name = "qagen")]
#[command(version)]
#[command(about = "Question/answer and free-form prompt generator backed by a hosted LLM")]
#[command(
    long_about = "qagen serves a small web UI and a JSON endpoint that turns either a \
    subject/topic/subtopic triple or a free-form prompt into model output. \
    The API key and model name come from GEMINI_API_KEY and GEMINI_MODEL \
    (a .env file is read if present) or from the config file."
)]
pub struct Cli {
    /// Path to configuration file (config.toml is used if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# qagen configuration
#
# Every section is optional. The API key and model name may instead be set
# through GEMINI_API_KEY and GEMINI_MODEL (environment or .env file), which
# take precedence over the values below.

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "127.0.0.1"

# Port to listen on
port = 8000

[model]
# API credential for the Generative Language API
# api_key = "your-api-key"

# Model identifier, e.g. "gemini-1.5-flash"
# name = "gemini-1.5-flash"

# API base URL
base_url = "https://generativelanguage.googleapis.com/v1beta"

[assets]
# Directory served under /static
static_dir = "static"

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_config_path_is_unset() {
        let cli = Cli::parse_from(["qagen"]);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["qagen", "--config", "custom.toml"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["qagen", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn template_parses_as_config() {
        let config: Config =
            toml::from_str(generate_config_template()).expect("template should be valid TOML");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.assets.static_dir, "static");
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("[server]"));
        assert!(template.contains("[model]"));
        assert!(template.contains("[assets]"));
        assert!(template.contains("[observability]"));
    }
}
