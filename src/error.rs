use std::path::PathBuf;

quick_error! {
    /// Everything that can stop a generation run
    #[derive(Debug)]
    pub enum Error {
        ConfigRead(path: PathBuf, err: std::io::Error) {
            display("cannot read config file {}: {}", path.display(), err)
            source(err)
        }
        ConfigParse(err: serde_json::Error) {
            from()
            display("malformed config file: {}", err)
            source(err)
        }
        InvalidPort(var: String, value: String, err: std::num::ParseIntError) {
            display("parse error {}={:?}: {}", var, value, err)
            source(err)
        }
        UnknownDbType(kind: String) {
            display("unsupported database type {:?}", kind)
        }
        TypeTable(err: ron::error::SpannedError) {
            from()
            display("cannot load the type table: {}", err)
            source(err)
        }
        Connection(err: mysql::Error) {
            display("cannot connect to the catalog database: {}", err)
            source(err)
        }
        Query(err: mysql::Error) {
            display("catalog query failed: {}", err)
            source(err)
        }
        RowDecode(err: mysql::FromRowError) {
            display("cannot decode catalog row: {}", err)
        }
        UnsupportedType { table: String, column: String, data_type: String } {
            display("no compatible datatype ({}) for {}.{} found", data_type, table, column)
        }
        Format { line: usize, message: String } {
            display("malformed generated source, line {}: {}", line, message)
        }
        Write(target: String, err: std::io::Error) {
            display("cannot write {}: {}", target, err)
            source(err)
        }
    }
}
