// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Rendering catalog listings for the terminal

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use scanstore::{DatabaseMetadata, TableMetadata};
use serde_json::json;

use super::commands::OutputFormat;

pub struct CatalogFormatter;

impl CatalogFormatter {
    /// Registered tables as `id | name`
    pub fn format_tables(catalog: &DatabaseMetadata, format: OutputFormat) -> String {
        let rows: Vec<(i32, &str)> = catalog.tables().collect();
        Self::format_entries(&rows, "Table", format)
    }

    /// Registered jobs as `id | name`
    pub fn format_jobs(catalog: &DatabaseMetadata, format: OutputFormat) -> String {
        let rows: Vec<(i32, &str)> = catalog.jobs().collect();
        Self::format_entries(&rows, "Job", format)
    }

    fn format_entries(rows: &[(i32, &str)], label: &str, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let entries: Vec<_> = rows
                    .iter()
                    .map(|(id, name)| json!({ "id": id, "name": name }))
                    .collect();
                to_pretty_json(&json!(entries))
            }
            OutputFormat::Table => {
                if rows.is_empty() {
                    return format!("No {}s registered", label.to_lowercase());
                }
                let mut table = new_table();
                table.set_header(vec!["Id", label]);
                for (id, name) in rows {
                    table.add_row(vec![id.to_string(), name.to_string()]);
                }
                format!("{}\n\n{} {}(s)", table, rows.len(), label.to_lowercase())
            }
        }
    }

    /// One table's row layout and schema
    pub fn format_table_schema(table: &TableMetadata, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let columns: Vec<_> = table
                    .columns()
                    .iter()
                    .map(|c| json!({ "id": c.id(), "name": c.name(), "type": c.column_type().to_string() }))
                    .collect();
                to_pretty_json(&json!({
                    "id": table.id(),
                    "name": table.name(),
                    "num_rows": table.num_rows(),
                    "rows_per_item": table.rows_per_item(),
                    "num_items": table.num_items(),
                    "columns": columns,
                }))
            }
            OutputFormat::Table => {
                let mut summary = new_table();
                summary.set_header(vec!["Table", "Id", "Rows", "Rows/Item", "Items"]);
                summary.add_row(vec![
                    table.name().to_string(),
                    table.id().map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                    table.num_rows().to_string(),
                    table.rows_per_item().to_string(),
                    table.num_items().to_string(),
                ]);

                let mut columns = new_table();
                columns.set_header(vec!["Column Id", "Column", "Type"]);
                for column in table.columns() {
                    columns.add_row(vec![
                        column.id().to_string(),
                        column.name().to_string(),
                        column.column_type().to_string(),
                    ]);
                }
                format!("{}\n{}", summary, columns)
            }
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn to_pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
