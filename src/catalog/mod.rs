use std::str::FromStr;

use crate::config::Config;
use crate::error::Error;
use crate::types::*;

pub mod mysql;

/// Names of the environment variables overriding the connection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvNames {
    pub host: &'static str,
    pub port: &'static str,
    pub database: &'static str,
    pub user: &'static str,
    pub password: &'static str,
}

impl EnvNames {
    pub fn all(&self) -> [&'static str; 5] {
        [self.host, self.port, self.database, self.user, self.password]
    }
}

/// Everything that depends on the kind of database being described
pub trait Catalog {
    /// Environment variables read for this kind of database
    fn env_names(&self) -> EnvNames;

    /// Read the columns of the configured database, sorted by table name and ordinal position
    fn read_schema(&self, config: &Config) -> Result<Schema, Error>;

    /// Go type of a column
    fn map_type(&self, column: &ColumnDescriptor) -> Result<TypeMapping, Error>;
}

/// Supported kinds of database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    MySql,
}

impl Default for DbKind {
    fn default() -> Self {
        DbKind::MySql
    }
}

impl FromStr for DbKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("mysql") {
            Ok(DbKind::MySql)
        } else {
            Err(Error::UnknownDbType(s.to_string()))
        }
    }
}

impl DbKind {
    pub fn env_names(self) -> EnvNames {
        match self {
            DbKind::MySql => mysql::ENV_NAMES,
        }
    }

    pub fn catalog(self) -> Result<Box<dyn Catalog>, Error> {
        match self {
            DbKind::MySql => Ok(Box::new(mysql::MySql::new()?)),
        }
    }
}
