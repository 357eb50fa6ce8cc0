use std::collections::HashSet;

use itertools::Itertools;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Error;
use crate::types::*;

// --------------------------------------------------------------------------------------------------------------------
// Functions
// --------------------------------------------------------------------------------------------------------------------

/// Get the column definitions of the configured database
pub fn run(config: &Config, catalog: &dyn Catalog) -> Result<Schema, Error> {
    info!(
        "Reading columns of database '{}' from {}:{}",
        config.db_name, config.db_host, config.db_port
    );
    let schema = catalog.read_schema(config)?;

    if schema.is_empty() {
        warn!("No columns found for database '{}'", config.db_name);
    } else {
        info!("Found {} columns in {} tables", schema.len(), count_tables(&schema));
    }
    if let Some(table) = scattered_table(&schema) {
        warn!("Columns of table '{}' are not contiguous, it will be generated more than once", table);
    }

    Ok(schema)
}

// --------------------------------------------------------------------------------------------------------------------
// Private stuff
// --------------------------------------------------------------------------------------------------------------------

fn count_tables(columns: &[ColumnDescriptor]) -> usize {
    columns.iter().map(|c| &c.table_name).dedup().count()
}

/// First table whose columns appear in more than one run
fn scattered_table(columns: &[ColumnDescriptor]) -> Option<&str> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .map(|c| c.table_name.as_str())
        .dedup()
        .find(|table| !seen.insert(*table))
}
