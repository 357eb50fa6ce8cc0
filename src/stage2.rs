use std::collections::BTreeSet;

use itertools::Itertools;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Error;
use crate::gofmt;
use crate::types::*;

const TAG_SEPARATOR: &str = ";";

// Go identifiers can't start with a digit
const DIGIT_PREFIX: char = 'A';

// --------------------------------------------------------------------------------------------------------------------
// Public functions
// --------------------------------------------------------------------------------------------------------------------

/// Generate the formatted Go source for the given columns
pub fn run(config: &Config, catalog: &dyn Catalog, columns: &[ColumnDescriptor]) -> Result<String, Error> {
    let source = gen_source(config, catalog, columns)?;
    gofmt::format(&source)
}

/// Convert a table or column name to an exported Go name
///
/// `user_id` becomes `UserID`, `2fa_codes` becomes `A2faCodes`.
pub fn humanize(name: &str) -> String {
    let joined: String = name.split('_').map(title_case).collect();
    let fixed = joined.replace("Id", "ID");
    match fixed.chars().next() {
        Some(first) if first.is_numeric() => format!("{}{}", DIGIT_PREFIX, fixed),
        _ => fixed,
    }
}

// --------------------------------------------------------------------------------------------------------------------
// Private functions
// --------------------------------------------------------------------------------------------------------------------

/// Unformatted source, the columns must be grouped by table
fn gen_source(config: &Config, catalog: &dyn Catalog, columns: &[ColumnDescriptor]) -> Result<String, Error> {
    let mut imports = BTreeSet::new();
    let mut body = String::new();

    for (table, fields) in &columns.iter().group_by(|column| column.table_name.clone()) {
        let type_name = humanize(&table);
        debug!("Generating struct {} for table {}", type_name, table);

        body.push_str(&format!("// {}\n", type_name));
        if !config.struct_tag.is_empty() {
            body.push_str(&format!("// {}\n", config.struct_tag));
        }
        body.push_str(&format!("type {} struct{{\n", type_name));

        for column in fields {
            let mapping = catalog.map_type(column)?;
            if let Some(import) = mapping.import {
                imports.insert(import);
            }
            body.push_str(&gen_field(config, column, &mapping.go_type));
        }

        body.push_str("}\n\n");
    }

    Ok(gen_header(config, &imports) + &body)
}

fn gen_header(config: &Config, imports: &BTreeSet<String>) -> String {
    let mut header = format!("package {}\n\n", config.pkg_name);
    if !imports.is_empty() {
        header.push_str("import (\n");
        for import in imports {
            header.push_str(&format!("\t\"{}\"\n", import));
        }
        header.push_str(")\n\n");
    }
    header
}

fn gen_field(config: &Config, column: &ColumnDescriptor, go_type: &str) -> String {
    let mut field = format!("\t{} {}", humanize(&column.column_name), go_type);
    if !config.sql_tag.is_empty() {
        field.push_str(&format!(
            "\t`{}:\"{}\"`",
            config.sql_tag,
            gen_tags(column).join(TAG_SEPARATOR)
        ));
    }
    field.push('\n');
    field
}

fn gen_tags(column: &ColumnDescriptor) -> Vec<String> {
    let mut tags = vec![format!("column:{}", column.column_name)];
    match column.column_key {
        ColumnKey::Primary => tags.push("primary_key".to_string()),
        ColumnKey::Unique => tags.push("unique".to_string()),
        ColumnKey::None => {}
    }
    if !column.is_nullable {
        tags.push("not null".to_string());
    }
    tags
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mysql::MySql;
    use pretty_assertions::assert_eq;

    fn column(table: &str, name: &str, data_type: &str, is_nullable: bool, key: ColumnKey) -> ColumnDescriptor {
        ColumnDescriptor {
            table_name: table.to_string(),
            column_name: name.to_string(),
            is_nullable,
            data_type: data_type.to_string(),
            character_maximum_length: None,
            numeric_precision: None,
            numeric_scale: None,
            column_type: data_type.to_string(),
            column_key: key,
        }
    }

    fn config(sql_tag: &str, struct_tag: &str) -> Config {
        Config {
            pkg_name: "models".to_string(),
            sql_tag: sql_tag.to_string(),
            struct_tag: struct_tag.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn humanize_names() {
        assert_eq!(humanize("users"), "Users");
        assert_eq!(humanize("order_items"), "OrderItems");
        assert_eq!(humanize("user_id"), "UserID");
        assert_eq!(humanize("id_card_id"), "IDCardID");
        assert_eq!(humanize("id"), "ID");
        assert_eq!(humanize("2fa_codes"), "A2faCodes");
        assert_eq!(humanize("_private__name_"), "PrivateName");
        assert_eq!(humanize("camelCase"), "CamelCase");
    }

    #[test]
    fn humanize_is_idempotent() {
        for name in &["user_id", "id_card_id", "2fa_codes", "order_items", "created_at", "x"] {
            let once = humanize(name);
            assert_eq!(humanize(&once), once);
            assert!(!once.starts_with(|c: char| c.is_numeric()));
        }
    }

    #[test]
    fn tags() {
        let pk = column("t", "code", "varchar", false, ColumnKey::Primary);
        assert_eq!(gen_tags(&pk).join(TAG_SEPARATOR), "column:code;primary_key;not null");
        let nullable = column("t", "count", "int", true, ColumnKey::None);
        assert_eq!(gen_tags(&nullable).join(TAG_SEPARATOR), "column:count");
        let unique = column("t", "email", "varchar", true, ColumnKey::Unique);
        assert_eq!(gen_tags(&unique).join(TAG_SEPARATOR), "column:email;unique");
    }

    #[test]
    fn empty_schema() {
        let catalog = MySql::new().unwrap();
        assert_eq!(run(&config("sql", "table"), &catalog, &[]).unwrap(), "package models\n");
    }

    #[test]
    fn unformatted_source() {
        let catalog = MySql::new().unwrap();
        let columns = vec![column("orders", "order_id", "int", false, ColumnKey::Primary)];
        let source = gen_source(&config("", ""), &catalog, &columns).unwrap();
        assert_eq!(source, "package models\n\n// Orders\ntype Orders struct{\n\tOrderID int64\n}\n\n");
    }

    #[test]
    fn one_struct_per_table() {
        let catalog = MySql::new().unwrap();
        let columns = vec![
            column("accounts", "id", "bigint", false, ColumnKey::Primary),
            column("accounts", "logo", "blob", true, ColumnKey::None),
            column("sessions", "token", "char", false, ColumnKey::Unique),
            column("users", "name", "varchar", false, ColumnKey::None),
        ];
        let output = run(&config("", ""), &catalog, &columns).unwrap();
        let expected = concat!(
            "package models\n",
            "\n",
            "// Accounts\n",
            "type Accounts struct {\n",
            "\tID   int64\n",
            "\tLogo []byte\n",
            "}\n",
            "\n",
            "// Sessions\n",
            "type Sessions struct {\n",
            "\tToken string\n",
            "}\n",
            "\n",
            "// Users\n",
            "type Users struct {\n",
            "\tName string\n",
            "}\n",
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn struct_tag_and_imports() {
        let catalog = MySql::new().unwrap();
        let columns = vec![
            column("events", "happened_at", "datetime", false, ColumnKey::None),
            column("events", "note", "text", true, ColumnKey::None),
        ];
        let output = run(&config("db", "+gen:table"), &catalog, &columns).unwrap();
        let expected = concat!(
            "package models\n",
            "\n",
            "import (\n",
            "\t\"database/sql\"\n",
            "\t\"time\"\n",
            ")\n",
            "\n",
            "// Events\n",
            "// +gen:table\n",
            "type Events struct {\n",
            "\tHappenedAt time.Time      `db:\"column:happened_at;not null\"`\n",
            "\tNote       sql.NullString `db:\"column:note\"`\n",
            "}\n",
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn unsupported_type_stops_rendering() {
        let catalog = MySql::new().unwrap();
        let columns = vec![
            column("places", "name", "varchar", false, ColumnKey::None),
            column("places", "location", "point", false, ColumnKey::None),
        ];
        let err = run(&config("", ""), &catalog, &columns).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { ref column, .. } if column == "location"));
    }

    #[test]
    fn invalid_names_fail_formatting() {
        let catalog = MySql::new().unwrap();
        let columns = vec![column("audit-log", "id", "int", false, ColumnKey::None)];
        assert!(matches!(run(&config("", ""), &catalog, &columns), Err(Error::Format { .. })));
    }

    #[test]
    fn missing_package_name_fails_formatting() {
        let catalog = MySql::new().unwrap();
        let err = run(&Config::default(), &catalog, &[]).unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }
}
