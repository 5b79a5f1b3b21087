use clap::Parser;
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"Chat with Gemini and generate videos with Veo from the terminal

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/pychat/config.toml
    * $HOME/.config/pychat/config.toml
    * $HOME/.pychat.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .or_else(lookup_config_path)
            .unwrap_or_default();

        if config_path.is_empty() {
            return Ok(Configuration::default());
        }
        load_configuration(&config_path)
            .wrap_err_with(|| format!("loading configuration from {}", config_path))
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::new()
    }
}
