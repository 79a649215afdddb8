use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    match Config::load() {
        Ok(config) => {
            println!("{} {}", "Config file:".bold(), path.display());
            println!();
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Err(e) => {
            println!("{e}");
            println!();
            println!("{}", "Defaults in effect:".bold());
            println!("  defaults.theme        dark");
            println!("  defaults.start_mode   first");
        }
    }
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!("{}", format!("Set {key} = {value}").green());
    println!("{}", format!("Saved to {}", path.display()).dimmed());
    Ok(())
}
