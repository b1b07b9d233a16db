// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for Scanstore

use colored::Colorize;

use super::commands::OutputFormat;
use super::output::CatalogFormatter;
use scanstore::{
    CatalogConfig, CatalogError, CatalogStore, Column, ColumnType, DatabaseMetadata,
    TableMetadata,
};

/// Handle the version command
pub fn handle_version() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format!("scanstore {}", env!("CARGO_PKG_VERSION")).bold());
    let mut backends = vec!["posix"];
    if cfg!(feature = "sled-backend") {
        backends.push("sled");
    }
    if cfg!(feature = "redb-backend") {
        backends.push("redb");
    }
    println!("Storage backends: {}", backends.join(", "));
    println!("Descriptor formats: bincode, json");
    Ok(())
}

/// Handle the init command
pub fn handle_init(config: &CatalogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let existed = store.load_catalog().is_ok();
    let catalog = store.init_catalog()?;
    store.backend().flush()?;

    if existed {
        println!(
            "{}",
            format!(
                "Catalog already present at {:?} ({} tables, {} jobs)",
                config.db_path,
                catalog.tables().count(),
                catalog.jobs().count()
            )
            .yellow()
        );
    } else {
        println!(
            "{}",
            format!("Initialized empty catalog at {:?}", config.db_path)
                .bold()
                .green()
        );
        println!("  Storage: {}", config.storage_type);
        println!("  Descriptor format: {}", config.format);
    }
    Ok(())
}

/// Handle the tables command
pub fn handle_tables(
    config: &CatalogConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let catalog = load_catalog(&store, config)?;
    println!("{}", CatalogFormatter::format_tables(&catalog, format));
    Ok(())
}

/// Handle the jobs command
pub fn handle_jobs(
    config: &CatalogConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let catalog = load_catalog(&store, config)?;
    println!("{}", CatalogFormatter::format_jobs(&catalog, format));
    Ok(())
}

/// Handle the describe command
pub fn handle_describe(
    config: &CatalogConfig,
    table: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let catalog = load_catalog(&store, config)?;
    let table = store.load_table_by_name(&catalog, table)?;
    println!("{}", CatalogFormatter::format_table_schema(&table, format));
    Ok(())
}

/// Handle the create-table command
pub fn handle_create_table(
    config: &CatalogConfig,
    name: String,
    column_specs: &[String],
    rows: i64,
    rows_per_item: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let columns = column_specs
        .iter()
        .enumerate()
        .map(|(i, spec)| parse_column_spec(i as i32, spec))
        .collect::<Result<Vec<_>, _>>()?;

    let store = open_store(config)?;
    let mut catalog = store.load_or_init_catalog()?;
    let mut table = TableMetadata::new(name, columns, rows, rows_per_item)?;

    let table_id = store.write_new_table(&mut catalog, &mut table)?;
    store.backend().flush()?;

    println!(
        "{}",
        format!("Created table '{}' with id {}", table.name(), table_id).green()
    );
    Ok(())
}

/// Handle the drop-table command
pub fn handle_drop_table(
    config: &CatalogConfig,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let mut catalog = load_catalog(&store, config)?;
    let table_id = catalog.get_table_id(name)?;

    store.delete_table(&mut catalog, table_id)?;
    store.backend().flush()?;

    println!(
        "{}",
        format!("Dropped table '{}' (id {})", name, table_id).green()
    );
    println!(
        "{}",
        "Its descriptor stays in storage and is reported by 'orphans'".yellow()
    );
    Ok(())
}

/// Handle the orphans command
pub fn handle_orphans(config: &CatalogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let catalog = load_catalog(&store, config)?;
    let orphans = store.find_orphans(&catalog)?;

    if orphans.is_empty() {
        println!("{}", "No orphaned descriptors".green());
        return Ok(());
    }
    for table_id in &orphans.tables {
        println!(
            "  table {:>4}  {}",
            table_id,
            store.paths().table_path(*table_id).cyan()
        );
    }
    for job_id in &orphans.jobs {
        println!(
            "  job   {:>4}  {}",
            job_id,
            store.paths().job_path(*job_id).cyan()
        );
    }
    println!(
        "{}",
        format!(
            "{} orphaned table and {} orphaned job descriptor(s)",
            orphans.tables.len(),
            orphans.jobs.len()
        )
        .yellow()
    );
    Ok(())
}

fn open_store(config: &CatalogConfig) -> Result<CatalogStore, Box<dyn std::error::Error>> {
    CatalogStore::open(config).map_err(|e| {
        format!(
            "Failed to open {} storage at {:?}: {}",
            config.storage_type, config.db_path, e
        )
        .into()
    })
}

fn load_catalog(
    store: &CatalogStore,
    config: &CatalogConfig,
) -> Result<DatabaseMetadata, Box<dyn std::error::Error>> {
    match store.load_catalog() {
        Err(CatalogError::NotFound(_)) => Err(format!(
            "No catalog found at {:?}. Run 'scanstore init --path {:?}' first.",
            config.db_path, config.db_path
        )
        .into()),
        other => Ok(other?),
    }
}

/// Parse a `name:type` column argument
fn parse_column_spec(id: i32, spec: &str) -> Result<Column, String> {
    let (name, column_type) = spec
        .split_once(':')
        .ok_or_else(|| format!("Column '{}' must be given as name:type", spec))?;
    if name.is_empty() {
        return Err(format!("Column '{}' has an empty name", spec));
    }
    let column_type: ColumnType = column_type.parse()?;
    Ok(Column::new(id, name, column_type))
}
