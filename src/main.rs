//! polyglot - builds one static site tree per configured language.

#![allow(dead_code)]

mod cli;
mod config;
mod convert;
mod core;
mod i18n;
mod logger;
mod page;
mod site;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{ConfigError, SiteConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = match SiteConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => exit_with_config_error(err),
    };

    let result = match &cli.command {
        Commands::Build { .. } => cli::build::build_all(&config).map(|_| ()),
        Commands::Lookup { args } => cli::lookup::run_lookup(args, &config),
    };

    if let Err(err) = result {
        if let Some(config_err) = err.downcast_ref::<ConfigError>() {
            log!("error"; "{}", config_err);
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

/// Print configuration problems and exit with status 1.
fn exit_with_config_error(err: anyhow::Error) -> ! {
    match err.downcast_ref::<ConfigError>() {
        Some(config_err) => log!("error"; "{}", config_err),
        None => log!("error"; "{:#}", err),
    }
    std::process::exit(1);
}
