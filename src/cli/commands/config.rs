use crate::cli::args::{ConfigArgs, ConfigCommand};
use crate::config::{Config, CONFIG_KEYS};
use crate::error::Result;

/// Execute config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("✅ Configuration updated: {} = {}", key, value);
            Ok(())
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{}: {}", key, value),
                None => println!("Configuration key '{}' is not set", key),
            }
            Ok(())
        }
        ConfigCommand::Unset { key } => {
            let mut config = Config::load()?;
            config.unset(&key)?;
            config.save()?;
            println!("✅ Configuration removed: {}", key);
            Ok(())
        }
        ConfigCommand::List => {
            let config = Config::load()?;
            for key in CONFIG_KEYS {
                let value = config.get(key).unwrap_or_else(|| "(default)".to_string());
                println!("{} = {}", key, value);
            }
            Ok(())
        }
        ConfigCommand::Path => {
            let path = Config::config_file_path()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
        ConfigCommand::Init => {
            Config::initialize()?;
            println!("✅ Configuration initialized at {}", Config::config_file_path()?.display());
            println!();
            println!("To change the default delay between requests, run:");
            println!("  taxlaw config set download.sleep_seconds 1.0");
            Ok(())
        }
    }
}
