use clap::{Args, Subcommand};

use super::OutputFormat;
use nutridb::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");
                        println!(
                            "Default config file: {}",
                            Config::default_config_path().display()
                        );
                        println!();
                        println!("host:       {}", config.host);
                        println!("port:       {}", config.port);
                        println!("data_dir:   {}", config.data_dir.display());
                        println!("public_dir: {}", config.public_dir.display());
                        println!();

                        let storage = config.storage();
                        println!("database:   {}", storage.database_path().display());
                        println!("name index: {}", storage.index_path().display());
                    }
                }
                Ok(())
            }
        }
    }
}
