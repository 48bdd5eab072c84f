//! Catalog query templates per dialect
//!
//! Every query yields text columns only (casts are explicit), so a
//! [`CatalogClient`](super::CatalogClient) never needs to know result types.
//! Per-table queries take the table name as their single parameter.

use schemakit_types::Dialect;

/// Base tables, ordered by name. One column: name.
pub const fn tables(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::SQLite => sqlite::TABLES,
        Dialect::PostgreSQL => postgres::TABLES,
        Dialect::MySQL => mysql::TABLES,
    }
}

/// Columns in declaration order: name, type, nullable flag, default.
pub const fn columns(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::SQLite => sqlite::COLUMNS,
        Dialect::PostgreSQL => postgres::COLUMNS,
        Dialect::MySQL => mysql::COLUMNS,
    }
}

/// Primary-key column names in key order.
pub const fn primary_key(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::SQLite => sqlite::PRIMARY_KEY,
        Dialect::PostgreSQL => postgres::PRIMARY_KEY,
        Dialect::MySQL => mysql::PRIMARY_KEY,
    }
}

/// Foreign keys: local column, target table, target column (may be null).
pub const fn foreign_keys(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::SQLite => sqlite::FOREIGN_KEYS,
        Dialect::PostgreSQL => postgres::FOREIGN_KEYS,
        Dialect::MySQL => mysql::FOREIGN_KEYS,
    }
}

/// Exact row count of one table. The name is spliced in quoted, since
/// identifiers cannot be bound as parameters.
pub fn row_count(dialect: Dialect, table: &str) -> String {
    let table = dialect.quote_ident(table);
    match dialect {
        Dialect::SQLite => format!("SELECT COUNT(*) FROM {table}"),
        Dialect::PostgreSQL => format!("SELECT COUNT(*)::text FROM {table}"),
        Dialect::MySQL => format!("SELECT CAST(COUNT(*) AS CHAR) FROM {table}"),
    }
}

pub mod sqlite {
    pub const TABLES: &str = r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
          AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
        ORDER BY name
    "#;

    pub const COLUMNS: &str = r#"
        SELECT name, type, "notnull" = 0, dflt_value
        FROM pragma_table_info(?1)
        ORDER BY cid
    "#;

    pub const PRIMARY_KEY: &str = r#"
        SELECT name
        FROM pragma_table_info(?1)
        WHERE pk > 0
        ORDER BY pk
    "#;

    pub const FOREIGN_KEYS: &str = r#"
        SELECT "from", "table", "to"
        FROM pragma_foreign_key_list(?1)
        ORDER BY id, seq
    "#;
}

pub mod postgres {
    pub const TABLES: &str = r#"
        SELECT table_name::text
        FROM information_schema.tables
        WHERE table_schema = current_schema()
          AND table_type = 'BASE TABLE'
        ORDER BY table_name
    "#;

    pub const COLUMNS: &str = r#"
        SELECT
            column_name::text,
            data_type::text,
            (is_nullable = 'YES')::text,
            column_default::text
        FROM information_schema.columns
        WHERE table_schema = current_schema()
          AND table_name::text = $1
        ORDER BY ordinal_position
    "#;

    pub const PRIMARY_KEY: &str = r#"
        SELECT kcu.column_name::text
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
          ON kcu.constraint_name = tc.constraint_name
         AND kcu.table_schema = tc.table_schema
         AND kcu.table_name = tc.table_name
        WHERE tc.constraint_type = 'PRIMARY KEY'
          AND tc.table_schema = current_schema()
          AND tc.table_name::text = $1
        ORDER BY kcu.ordinal_position
    "#;

    pub const FOREIGN_KEYS: &str = r#"
        SELECT
            kcu.column_name::text,
            ccu.table_name::text,
            ccu.column_name::text
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
          ON kcu.constraint_name = tc.constraint_name
         AND kcu.table_schema = tc.table_schema
        JOIN information_schema.constraint_column_usage ccu
          ON ccu.constraint_name = tc.constraint_name
         AND ccu.table_schema = tc.table_schema
        WHERE tc.constraint_type = 'FOREIGN KEY'
          AND tc.table_schema = current_schema()
          AND tc.table_name::text = $1
        ORDER BY kcu.ordinal_position
    "#;
}

pub mod mysql {
    pub const TABLES: &str = r#"
        SELECT CAST(TABLE_NAME AS CHAR)
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_TYPE = 'BASE TABLE'
        ORDER BY TABLE_NAME
    "#;

    pub const COLUMNS: &str = r#"
        SELECT
            CAST(COLUMN_NAME AS CHAR),
            CAST(COLUMN_TYPE AS CHAR),
            CAST(IS_NULLABLE = 'YES' AS CHAR),
            CAST(COLUMN_DEFAULT AS CHAR)
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    pub const PRIMARY_KEY: &str = r#"
        SELECT CAST(COLUMN_NAME AS CHAR)
        FROM information_schema.KEY_COLUMN_USAGE
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_NAME = ?
          AND CONSTRAINT_NAME = 'PRIMARY'
        ORDER BY ORDINAL_POSITION
    "#;

    // COLUMN_KEY = 'MUL' also marks plain indexes and carries no target
    pub const FOREIGN_KEYS: &str = r#"
        SELECT
            CAST(COLUMN_NAME AS CHAR),
            CAST(REFERENCED_TABLE_NAME AS CHAR),
            CAST(REFERENCED_COLUMN_NAME AS CHAR)
        FROM information_schema.KEY_COLUMN_USAGE
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_NAME = ?
          AND REFERENCED_TABLE_NAME IS NOT NULL
        ORDER BY ORDINAL_POSITION
    "#;
}
