use derive_deref::Deref;

// --------------------------------------------------------------------------------------------------------------------
// Catalog data
// --------------------------------------------------------------------------------------------------------------------

/// Key classification of a column, as reported by `COLUMN_KEY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    None,
    Primary,
    Unique,
}

impl ColumnKey {
    pub fn from_catalog(key: &str) -> Self {
        match key {
            "PRI" => ColumnKey::Primary,
            "UNI" => ColumnKey::Unique,
            _ => ColumnKey::None,
        }
    }
}

/// One row of column metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub table_name: String,
    pub column_name: String,
    pub is_nullable: bool,
    pub data_type: String,
    pub character_maximum_length: Option<u64>,
    pub numeric_precision: Option<u64>,
    pub numeric_scale: Option<u64>,
    pub column_type: String,
    pub column_key: ColumnKey,
}

/// Columns of a database, grouped by table and in ordinal order within each table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Schema(Vec<ColumnDescriptor>);

impl From<Vec<ColumnDescriptor>> for Schema {
    fn from(columns: Vec<ColumnDescriptor>) -> Self {
        Schema(columns)
    }
}

// --------------------------------------------------------------------------------------------------------------------
// Go types
// --------------------------------------------------------------------------------------------------------------------

pub const SQL_PACKAGE: &str = "database/sql";
pub const TIME_PACKAGE: &str = "time";

/// Families of SQL types sharing one Go representation
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Text,
    Bytes,
    Temporal,
    Integer,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub go_type: String,
    pub import: Option<String>,
}

impl TypeMapping {
    fn new(go_type: &str) -> Self {
        TypeMapping {
            go_type: go_type.to_string(),
            import: None,
        }
    }

    fn with_import(go_type: &str, import: &str) -> Self {
        TypeMapping {
            go_type: go_type.to_string(),
            import: Some(import.to_string()),
        }
    }
}

impl TypeFamily {
    /// Go type used for a column of this family
    ///
    /// NOTE: byte slices and time.Time have no nullable wrapper, NULL values in those columns
    ///       will fail to scan. Kept this way so existing generated code doesn't change.
    pub fn go_type(self, nullable: bool) -> TypeMapping {
        match (self, nullable) {
            (TypeFamily::Text, false) => TypeMapping::new("string"),
            (TypeFamily::Text, true) => TypeMapping::with_import("sql.NullString", SQL_PACKAGE),
            (TypeFamily::Bytes, _) => TypeMapping::new("[]byte"),
            (TypeFamily::Temporal, _) => TypeMapping::with_import("time.Time", TIME_PACKAGE),
            (TypeFamily::Integer, false) => TypeMapping::new("int64"),
            (TypeFamily::Integer, true) => TypeMapping::with_import("sql.NullInt64", SQL_PACKAGE),
            (TypeFamily::Float, false) => TypeMapping::new("float64"),
            (TypeFamily::Float, true) => TypeMapping::with_import("sql.NullFloat64", SQL_PACKAGE),
        }
    }
}
