// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Scanstore command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        cli.log_level
            .map(|l| l.to_level_filter())
            .unwrap_or(log::LevelFilter::Warn)
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Version = cli.command {
        return cli::handle_version();
    }

    let config = cli.catalog_config()?;
    log::debug!("Using configuration {:?}", config);

    match cli.command {
        Commands::Version => Ok(()),
        Commands::Init => cli::handle_init(&config),
        Commands::Tables { format } => cli::handle_tables(&config, format),
        Commands::Jobs { format } => cli::handle_jobs(&config, format),
        Commands::Describe { table, format } => cli::handle_describe(&config, &table, format),
        Commands::CreateTable {
            name,
            columns,
            rows,
            rows_per_item,
        } => cli::handle_create_table(&config, name, &columns, rows, rows_per_item),
        Commands::DropTable { name } => cli::handle_drop_table(&config, &name),
        Commands::Orphans => cli::handle_orphans(&config),
    }
}
