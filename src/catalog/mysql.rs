use std::collections::BTreeMap;

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Row};

use super::{Catalog, EnvNames};
use crate::config::Config;
use crate::error::Error;
use crate::types::*;

pub const ENV_NAMES: EnvNames = EnvNames {
    host: "MYSQL_HOST",
    port: "MYSQL_PORT",
    database: "MYSQL_DATABASE",
    user: "MYSQL_USER",
    password: "MYSQL_PASSWORD",
};

const CATALOG_DATABASE: &str = "information_schema";
const COLUMNS_SQL: &str = include_str!("../resources/mysql_columns.sql");

// TABLE_NAME, COLUMN_NAME, IS_NULLABLE, DATA_TYPE, CHARACTER_MAXIMUM_LENGTH,
// NUMERIC_PRECISION, NUMERIC_SCALE, COLUMN_TYPE, COLUMN_KEY
type ColumnRow = (
    String,
    String,
    String,
    String,
    Option<u64>,
    Option<u64>,
    Option<u64>,
    String,
    String,
);

pub struct MySql {
    families: BTreeMap<String, TypeFamily>,
}

impl MySql {
    pub fn new() -> Result<Self, Error> {
        let families = ron::from_str(include_str!("../resources/mysql_types.ron"))?;
        Ok(MySql { families })
    }
}

impl Catalog for MySql {
    fn env_names(&self) -> EnvNames {
        ENV_NAMES
    }

    fn read_schema(&self, config: &Config) -> Result<Schema, Error> {
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.db_host.as_str()))
            .tcp_port(config.db_port)
            .user(Some(config.db_user.as_str()))
            .pass(Some(config.db_password.as_str()))
            .db_name(Some(CATALOG_DATABASE));

        // The connection is closed when it goes out of scope
        let mut conn = Conn::new(opts).map_err(Error::Connection)?;
        debug!("Connected to {}:{}", config.db_host, config.db_port);

        let rows: Vec<Row> = conn
            .exec(COLUMNS_SQL, (config.db_name.clone(),))
            .map_err(Error::Query)?;

        let columns = rows.into_iter().map(parse_column).collect::<Result<Vec<_>, _>>()?;
        Ok(Schema::from(columns))
    }

    fn map_type(&self, column: &ColumnDescriptor) -> Result<TypeMapping, Error> {
        match self.families.get(&column.data_type) {
            Some(family) => Ok(family.go_type(column.is_nullable)),
            None => Err(Error::UnsupportedType {
                table: column.table_name.clone(),
                column: column.column_name.clone(),
                data_type: column.data_type.clone(),
            }),
        }
    }
}

/// Parse a row of `information_schema.COLUMNS`
/// https://dev.mysql.com/doc/refman/8.0/en/information-schema-columns-table.html
///
fn parse_column(row: Row) -> Result<ColumnDescriptor, Error> {
    let row: ColumnRow = mysql::from_row_opt(row).map_err(Error::RowDecode)?;
    Ok(from_catalog_row(row))
}

fn from_catalog_row(row: ColumnRow) -> ColumnDescriptor {
    let (
        table_name,
        column_name,
        is_nullable,
        data_type,
        character_maximum_length,
        numeric_precision,
        numeric_scale,
        column_type,
        column_key,
    ) = row;

    ColumnDescriptor {
        table_name,
        column_name,
        is_nullable: is_nullable == "YES",
        data_type,
        character_maximum_length,
        numeric_precision,
        numeric_scale,
        column_type,
        column_key: ColumnKey::from_catalog(&column_key),
    }
}
