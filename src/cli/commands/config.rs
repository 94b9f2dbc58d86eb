use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format: json, toml, yaml
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Validate configuration and check the hook runner is installed
    Validate,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&Path>, quiet: bool) -> Result<()> {
    use crate::cli::Output;
    use crate::config::smart_load::ConfigFormat;

    let output = Output::new(quiet);

    match args.command {
        ConfigCommand::Show { format } => {
            let config = super::load_config(custom_config)?;

            let format_enum = match format.to_lowercase().as_str() {
                "json" => ConfigFormat::Json,
                "yaml" | "yml" => ConfigFormat::Yaml,
                "toml" => ConfigFormat::Toml,
                _ => {
                    return Err(anyhow::anyhow!(
                        "Unsupported format: {}. Use json, toml, or yaml",
                        format
                    ));
                }
            };

            let rendered = match format_enum {
                ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
                ConfigFormat::Toml => {
                    toml::to_string_pretty(&config).context("Failed to render TOML")?
                }
                ConfigFormat::Yaml => serde_yml::to_string(&config).context("Failed to render YAML")?,
            };
            println!("{}", rendered.trim_end());
        }
        ConfigCommand::Validate => {
            let config = super::load_config(custom_config)?;

            match which::which(&config.runner.executable) {
                Ok(path) => {
                    output.key_value("Runner:", &path.display().to_string(), true);
                }
                Err(_) => {
                    output.error(&format!(
                        "Hook runner '{}' not found on PATH",
                        config.runner.executable
                    ));
                    return Err(anyhow::anyhow!(
                        "Hook runner '{}' is not installed",
                        config.runner.executable
                    ));
                }
            }

            output.key_value("Timeout:", &format!("{}s", config.runner.timeout_secs), false);
            output.success("Configuration is valid!");
        }
    }

    Ok(())
}
