#[macro_use]
extern crate log;

#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate serde;

use std::io::prelude::*;
use std::path::Path;

pub mod catalog;
mod config;
mod error;
pub mod gofmt;
mod stage1;
mod stage2;
mod types;

pub use catalog::{Catalog, DbKind, EnvNames};
pub use config::Config;
pub use error::Error;
pub use stage2::humanize;
pub use types::*;

// Run the transformation
pub fn run(config: &Config) -> Result<String, Error> {
    let catalog = config.kind()?.catalog()?;
    let schema = stage1::run(config, catalog.as_ref())?;
    stage2::run(config, catalog.as_ref(), &schema)
}

/// Render already known columns, they must be sorted by table name and ordinal position
pub fn render(config: &Config, catalog: &dyn Catalog, columns: &[ColumnDescriptor]) -> Result<String, Error> {
    stage2::run(config, catalog, columns)
}

/// Write the generated code to the configured output file, or to stdout if there is none
pub fn write_output(config: &Config, code: &str) -> Result<(), Error> {
    if config.output_file.is_empty() {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        return writeln!(handle, "{}", code).map_err(|e| Error::Write("stdout".to_string(), e));
    }

    let path = Path::new(&config.output_file);
    let write_error = |e: std::io::Error| Error::Write(config.output_file.clone(), e);

    // Create the output directory if it doesn't exist
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_error)?;
    }

    let mut file = std::fs::File::create(path).map_err(write_error)?;
    file.write_all(code.as_bytes()).map_err(write_error)?;
    info!("Wrote {}", config.output_file);
    Ok(())
}
