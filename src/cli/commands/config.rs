//! `minv config` command - Inspect the layered configuration

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::locate_project;
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("database", "Database file (relative paths resolve against the project root)"),
    ("default_format", "Default output format (tsv, csv, md, json, yaml, id)"),
    ("log_level", "Log level when --verbose is not given (error, warn, info, debug)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn get_config_value(config: &Config, project: Option<&crate::core::Project>, key: &str) -> Option<String> {
    match key {
        "database" => config
            .database_path(project)
            .map(|p| p.display().to_string()),
        "default_format" => config.default_format.clone(),
        "log_level" => Some(config.log_level().to_string()),
        _ => None,
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = locate_project(global)?;
    let config = Config::load(project.as_ref())?;

    if let Some(key) = &args.key {
        if !VALID_KEYS.iter().any(|(k, _)| k == key) {
            return Err(miette::miette!(
                help = "run `minv config keys` to list valid keys",
                "unknown configuration key '{}'",
                key
            ));
        }
        return match get_config_value(&config, project.as_ref(), key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        match get_config_value(&config, project.as_ref(), key) {
            Some(v) => println!("  {:<16} {}", style(key).cyan(), v),
            None => println!("  {:<16} {}", style(key).cyan(), style("(not set)").dim()),
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  {}", style("1. Command-line flags").dim());
    println!("  {}", style("2. Environment (MINV_DATABASE, MINV_FORMAT, MINV_LOG)").dim());
    println!("  {}", style("3. Project config (.minv/config.yaml)").dim());
    println!("  {}", style("4. Global config").dim());
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    let project = locate_project(global)?;

    match project {
        Some(project) => println!("project: {}", project.config_path().display()),
        None => println!("project: {}", style("(no project found)").dim()),
    }
    match Config::global_config_path() {
        Some(path) => println!("global:  {}", path.display()),
        None => println!("global:  {}", style("(no config directory)").dim()),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    for (key, description) in VALID_KEYS {
        println!("{:<16} {}", style(key).cyan(), description);
    }
    Ok(())
}
