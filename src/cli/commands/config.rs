use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            println!("📄 Configuration ({}):\n", Config::config_file().display());
            println!("{}", cfg.to_yaml()?);
        }

        if *check {
            match &cfg.remote {
                None => warning("No remote block: sync stays disconnected."),
                Some(remote) => match remote.validate() {
                    Ok(()) => success(format!("Remote store: mongodb {}", remote.target())),
                    Err(reason) => warning(format!("Remote block unusable: {reason}")),
                },
            }
            println!(
                "Sync interval: {}s, debounce: {}s, employees: {}",
                cfg.sync_interval().as_secs(),
                cfg.debounce().as_secs(),
                cfg.employees.len()
            );
        }
    }

    Ok(())
}
