use std::path::Path;

use crate::catalog::{DbKind, EnvNames};
use crate::error::Error;

pub const DEFAULT_DB_TYPE: &str = "mysql";
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Settings for one generation run
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub db_type: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_host: String,
    pub db_port: u16,
    /// Output file, stdout if empty
    pub output_file: String,
    /// Name of the package holding the structs
    pub pkg_name: String,
    /// Tag key matching database column names with struct fields, no field tags if empty
    pub sql_tag: String,
    /// Extra comment line added to every struct, none if empty
    pub struct_tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_type: DEFAULT_DB_TYPE.to_string(),
            db_user: String::new(),
            db_password: String::new(),
            db_name: String::new(),
            db_host: String::new(),
            db_port: DEFAULT_DB_PORT,
            output_file: String::new(),
            pkg_name: String::new(),
            sql_tag: String::new(),
            struct_tag: String::new(),
        }
    }
}

impl Config {
    /// Build the configuration from the defaults, the optional JSON file and the environment, in that order
    pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if config.db_type.is_empty() {
            config.db_type = DEFAULT_DB_TYPE.to_string();
        }

        // An unknown kind is reported when the catalog is needed, the host check comes first
        let names = config.kind().unwrap_or_default().env_names();
        config.apply_env(&names, lookup)?;
        Ok(config)
    }

    /// Read a JSON configuration file, fields missing from it keep their defaults
    pub fn from_file(path: &Path) -> Result<Config, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead(path.to_path_buf(), e))?;
        Config::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Config, Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Override the connection settings with the variables that are set
    pub fn apply_env<F>(&mut self, names: &EnvNames, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(names.host) {
            self.db_host = host;
        }
        if let Some(port) = lookup(names.port) {
            self.db_port = port
                .parse()
                .map_err(|e| Error::InvalidPort(names.port.to_string(), port.clone(), e))?;
        }
        if let Some(database) = lookup(names.database) {
            self.db_name = database;
        }
        if let Some(user) = lookup(names.user) {
            self.db_user = user;
        }
        if let Some(password) = lookup(names.password) {
            self.db_password = password;
        }
        Ok(())
    }

    pub fn kind(&self) -> Result<DbKind, Error> {
        self.db_type.parse()
    }

    /// Without a host there is nothing to connect to
    pub fn has_host(&self) -> bool {
        !self.db_host.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::load(None, env(&[])).unwrap();
        assert_eq!(config.db_type, "mysql");
        assert_eq!(config.db_port, 3306);
        assert!(!config.has_host());
    }

    #[test]
    fn file_keeps_missing_fields_and_ignores_unknown_ones() {
        let config = Config::from_json(r#"{"db_host": "db", "pkg_name": "models", "colour": "blue"}"#).unwrap();
        assert_eq!(config.db_host, "db");
        assert_eq!(config.pkg_name, "models");
        assert_eq!(config.db_type, "mysql");
        assert_eq!(config.db_port, 3306);
    }

    #[test]
    fn empty_db_type_falls_back_to_mysql() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"db_type": "", "db_host": "localhost"}}"#).unwrap();
        let config = Config::load(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.db_type, "mysql");
        assert_eq!(config.kind().unwrap(), DbKind::MySql);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"db_host": "file-host", "db_port": 3307, "db_name": "shop", "db_user": "file"}}"#
        )
        .unwrap();
        let config = Config::load(
            Some(file.path()),
            env(&[("MYSQL_HOST", "env-host"), ("MYSQL_PORT", "3308"), ("MYSQL_PASSWORD", "secret")]),
        )
        .unwrap();
        assert_eq!(config.db_host, "env-host");
        assert_eq!(config.db_port, 3308);
        assert_eq!(config.db_name, "shop");
        assert_eq!(config.db_user, "file");
        assert_eq!(config.db_password, "secret");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = Config::load(None, env(&[("MYSQL_HOST", "localhost"), ("MYSQL_PORT", "abc")])).unwrap_err();
        assert!(matches!(err, Error::InvalidPort(ref var, ref value, _) if var == "MYSQL_PORT" && value == "abc"));
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(matches!(Config::from_json("{\"db_port\": \"x\"}"), Err(Error::ConfigParse(_))));
        assert!(matches!(Config::from_json("{"), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead(..)));
    }

    #[test]
    fn unknown_db_type_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"db_type": "oracle"}}"#).unwrap();
        let config = Config::load(Some(file.path()), env(&[("MYSQL_HOST", "db")])).unwrap();
        assert_eq!(config.db_host, "db");
        let err = config.kind().unwrap_err();
        assert!(matches!(err, Error::UnknownDbType(ref kind) if kind == "oracle"));
    }

    #[test]
    fn unknown_db_type_without_host_still_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"db_type": "oracle"}}"#).unwrap();
        let config = Config::load(Some(file.path()), env(&[])).unwrap();
        assert!(!config.has_host());
    }
}
