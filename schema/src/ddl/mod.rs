//! CREATE TABLE parsing and generation
//!
//! [`parse`] reads a DDL script into tables, best-effort per statement.
//! [`generate`] and [`export`] go the other way.

mod generate;
mod parser;

pub use generate::{DdlOptions, export, generate, generate_with};
pub use parser::{parse, parse_create_table};

use schemakit_types::Dialect;

/// Guess the dialect a script was written for.
///
/// Checked in order: `AUTOINCREMENT` means SQLite; `SERIAL`, `BYTEA` or `::`
/// casts mean PostgreSQL; `AUTO_INCREMENT` or `ENGINE=` mean MySQL. Anything
/// else is assumed to be SQLite.
pub fn detect_dialect(text: &str) -> Dialect {
    let upper = text.to_ascii_uppercase();

    if upper.contains("AUTOINCREMENT") {
        return Dialect::SQLite;
    }
    if upper.contains("SERIAL") || upper.contains("BYTEA") || upper.contains("::") {
        return Dialect::PostgreSQL;
    }
    let compact: String = upper.split_whitespace().collect();
    if upper.contains("AUTO_INCREMENT") || compact.contains("ENGINE=") {
        return Dialect::MySQL;
    }
    Dialect::SQLite
}

/// Rewrite every `CREATE TABLE` into `CREATE TABLE IF NOT EXISTS`, leaving
/// statements that already carry the guard alone.
pub fn if_not_exists(text: &str) -> String {
    const NEEDLE: &str = "CREATE TABLE";
    let upper = text.to_ascii_uppercase();
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for (pos, _) in upper.match_indices(NEEDLE) {
        let after = pos + NEEDLE.len();
        let guarded = upper[after..].trim_start().starts_with("IF NOT EXISTS");
        out.push_str(&text[last..after]);
        if !guarded {
            out.push_str(" IF NOT EXISTS");
        }
        last = after;
    }
    out.push_str(&text[last..]);
    out
}
