//! CREATE TABLE statement parser

use schemakit_types::Dialect;

use crate::lexer::{Token, TokenKind, matching_paren, split_statements, split_top_level, tokenize};
use crate::model::{ColumnInfo, SchemaInfo, TableInfo};
use crate::trace::schema_debug;

use super::detect_dialect;

/// Keywords that end a `DEFAULT` expression
const DEFAULT_STOP: &[&str] = &[
    "NOT",
    "NULL",
    "PRIMARY",
    "UNIQUE",
    "CHECK",
    "REFERENCES",
    "CONSTRAINT",
    "COLLATE",
    "GENERATED",
    "AUTOINCREMENT",
    "AUTO_INCREMENT",
    "ON",
    "COMMENT",
];

/// Words that continue a multi-word type name (`DOUBLE PRECISION`,
/// `TIMESTAMP WITH TIME ZONE`, `INT UNSIGNED`)
const TYPE_CONTINUATION: &[&str] = &[
    "PRECISION",
    "VARYING",
    "UNSIGNED",
    "ZEROFILL",
    "WITH",
    "WITHOUT",
    "TIME",
    "ZONE",
];

/// Words that can never be a column type, for typeless columns
const COLUMN_KEYWORDS: &[&str] = &[
    "NOT",
    "NULL",
    "PRIMARY",
    "DEFAULT",
    "REFERENCES",
    "UNIQUE",
    "CHECK",
    "CONSTRAINT",
    "COLLATE",
    "GENERATED",
];

const SERIAL_TYPES: &[&str] = &["SERIAL", "BIGSERIAL", "SMALLSERIAL"];

/// Parse every `CREATE TABLE` statement in `text`.
///
/// When `dialect` is `None` it is guessed with [`detect_dialect`]. Statements
/// that are not CREATE TABLE, or whose name or column body cannot be
/// isolated, are skipped; parsing never fails as a whole.
pub fn parse(text: &str, dialect: Option<Dialect>) -> SchemaInfo {
    let dialect = dialect.unwrap_or_else(|| detect_dialect(text));
    let tables = split_statements(text)
        .iter()
        .filter_map(|stmt| {
            let table = parse_create_table(stmt);
            if table.is_none() {
                let head: String = stmt.chars().take(40).collect();
                schema_debug!(statement = head; "skipping statement");
            }
            table
        })
        .collect();
    SchemaInfo::new(dialect, tables)
}

/// Parse a single `CREATE TABLE [IF NOT EXISTS] name (...)` statement.
pub fn parse_create_table(stmt: &str) -> Option<TableInfo> {
    let tokens = tokenize(stmt);
    if !(tokens.first()?.is_word("CREATE") && tokens.get(1)?.is_word("TABLE")) {
        return None;
    }

    let mut i = 2;
    if keywords_at(&tokens, i, &["IF", "NOT", "EXISTS"]) {
        i += 3;
    }

    let (name, next) = qualified_name(&tokens, i)?;
    if tokens.get(next)?.kind != TokenKind::LParen {
        return None;
    }
    let close = matching_paren(&tokens, next)?;
    let body = &stmt[tokens[next].end()..tokens[close].start];

    let mut table = TableInfo::new(name);
    let mut primary_key: Option<Vec<String>> = None;
    let mut foreign_keys = Vec::new();

    for def in split_top_level(body, ',') {
        match classify(def) {
            Definition::Column(col) => table.columns.push(col),
            Definition::PrimaryKey(cols) => primary_key = Some(cols),
            Definition::ForeignKey(fk) => foreign_keys.push(fk),
            Definition::Ignored => {}
        }
    }

    for fk in foreign_keys {
        for (n, local) in fk.columns.iter().enumerate() {
            if let Some(col) = table.column_mut(local) {
                col.set_reference(&fk.table, fk.targets.get(n).map(String::as_str));
            }
        }
    }

    if let Some(cols) = primary_key {
        table.set_primary_key(&cols);
    }
    if table.primary_keys.is_empty() {
        table.rebuild_primary_keys();
    }

    Some(table)
}

#[derive(Debug)]
struct ForeignKey {
    columns: Vec<String>,
    table: String,
    targets: Vec<String>,
}

#[derive(Debug)]
enum Definition {
    Column(ColumnInfo),
    PrimaryKey(Vec<String>),
    ForeignKey(ForeignKey),
    Ignored,
}

fn classify(def: &str) -> Definition {
    let tokens = tokenize(def);
    let mut toks = &tokens[..];

    let named = toks.first().is_some_and(|t| t.is_word("CONSTRAINT"));
    if named {
        toks = toks.get(2..).unwrap_or_default();
    }

    if keywords_at(toks, 0, &["PRIMARY", "KEY"]) {
        return match column_list(def, toks, 2) {
            Some((cols, _)) => Definition::PrimaryKey(cols),
            None => Definition::Ignored,
        };
    }

    if keywords_at(toks, 0, &["FOREIGN", "KEY"]) {
        return foreign_key(def, toks).map_or(Definition::Ignored, Definition::ForeignKey);
    }

    let Some(first) = toks.first() else {
        return Definition::Ignored;
    };
    if named
        || ["UNIQUE", "CHECK", "EXCLUDE", "FULLTEXT", "SPATIAL", "LIKE"]
            .iter()
            .any(|kw| first.is_word(kw))
        || ((first.is_word("KEY") || first.is_word("INDEX")) && is_index(def, toks))
    {
        return Definition::Ignored;
    }

    parse_column(def, toks).map_or(Definition::Ignored, Definition::Column)
}

/// `KEY name (cols)` / `INDEX (cols)` rather than a column named `key`
fn is_index(def: &str, toks: &[Token<'_>]) -> bool {
    let Some(second) = toks.get(1) else {
        return false;
    };
    if second.kind == TokenKind::LParen || second.is_word("USING") {
        return true;
    }
    match (toks.get(2), toks.get(2).and_then(|_| matching_paren(toks, 2))) {
        (Some(open), Some(close)) if open.kind == TokenKind::LParen => {
            let inner = &def[open.end()..toks[close].start];
            !inner
                .chars()
                .all(|c| c.is_ascii_digit() || c == ',' || c.is_whitespace())
        }
        _ => false,
    }
}

fn foreign_key(def: &str, toks: &[Token<'_>]) -> Option<ForeignKey> {
    let (columns, after) = column_list(def, toks, 2)?;
    if !toks.get(after)?.is_word("REFERENCES") {
        return None;
    }
    let (table, next) = qualified_name(toks, after + 1)?;
    let targets = column_list(def, toks, next)
        .map(|(cols, _)| cols)
        .unwrap_or_default();
    Some(ForeignKey {
        columns,
        table,
        targets,
    })
}

fn parse_column(def: &str, toks: &[Token<'_>]) -> Option<ColumnInfo> {
    let name = toks.first().filter(|t| t.is_ident())?;
    let mut col = ColumnInfo::new(name.value(), "");

    let mut i = 1;
    if let Some(ty) = toks
        .get(1)
        .filter(|t| t.is_ident() && !COLUMN_KEYWORDS.iter().any(|kw| t.is_word(kw)))
    {
        let mut sql_type = ty.value().into_owned();
        i = 2;
        loop {
            match toks.get(i) {
                Some(open) if open.kind == TokenKind::LParen => {
                    let Some(close) = matching_paren(toks, i) else {
                        break;
                    };
                    sql_type.push_str(&def[open.start..toks[close].end()]);
                    i = close + 1;
                }
                Some(word) if TYPE_CONTINUATION.iter().any(|kw| word.is_word(kw)) => {
                    sql_type.push(' ');
                    sql_type.push_str(word.raw);
                    i += 1;
                }
                _ => break,
            }
        }
        col.sql_type = sql_type;
    }

    let rest = &toks[i..];
    let modifiers = top_level_upper(rest);

    let base = col.sql_type.to_ascii_uppercase();
    if modifiers.contains("PRIMARY KEY") || SERIAL_TYPES.contains(&base.as_str()) {
        col.set_primary_key();
    }
    if modifiers.contains("NOT NULL") {
        col.is_nullable = false;
    }

    if let Some(k) = rest.iter().position(|t| t.is_word("DEFAULT")) {
        col.default = default_literal(def, &rest[k + 1..]);
    }

    if let Some(r) = rest.iter().position(|t| t.is_word("REFERENCES")) {
        if let Some((table, next)) = qualified_name(rest, r + 1) {
            let target = column_list(def, rest, next).and_then(|(cols, _)| cols.into_iter().next());
            col.set_reference(&table, target.as_deref());
        }
    }

    Some(col)
}

/// Upper-cased modifier text at paren depth zero, with string literals
/// blanked so their content never matches a keyword search.
fn top_level_upper(toks: &[Token<'_>]) -> String {
    let mut depth = 0usize;
    let mut words = Vec::new();
    for tok in toks {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Str => {}
            TokenKind::Word | TokenKind::Quoted(_) if depth == 0 => {
                words.push(tok.raw.to_ascii_uppercase());
            }
            _ => {}
        }
    }
    words.join(" ")
}

fn default_literal(def: &str, toks: &[Token<'_>]) -> Option<String> {
    let first = toks.first()?;
    let mut last = first;
    let mut depth = 0usize;

    for (n, tok) in toks.iter().enumerate() {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            _ if n > 0 && depth == 0 && DEFAULT_STOP.iter().any(|kw| tok.is_word(kw)) => break,
            _ => {}
        }
        last = tok;
    }

    if std::ptr::eq(first, last) && first.quote().is_some() {
        return Some(first.value().into_owned());
    }
    let raw = def[first.start..last.end()].trim_end_matches([',', ' ']);
    (!raw.is_empty()).then(|| raw.to_string())
}

/// A possibly schema-qualified name starting at `start`; returns the last
/// segment and the index of the first token after the name.
fn qualified_name(toks: &[Token<'_>], start: usize) -> Option<(String, usize)> {
    let mut last: Option<String> = None;
    let mut expect_more = false;
    let mut j = start;

    while let Some(tok) = toks.get(j) {
        let continues = last.is_none()
            || expect_more
            || (tok.kind == TokenKind::Word && tok.raw.starts_with('.'));
        if !continues {
            break;
        }
        match tok.kind {
            TokenKind::Quoted(_) => {
                last = Some(tok.value().into_owned());
                expect_more = false;
            }
            TokenKind::Word => {
                if let Some(seg) = tok.raw.rsplit('.').find(|s| !s.is_empty()) {
                    last = Some(seg.to_string());
                }
                expect_more = tok.raw.ends_with('.');
            }
            _ => break,
        }
        j += 1;
    }

    last.filter(|n| !n.is_empty()).map(|n| (n, j))
}

/// Column names of the first parenthesized list at or after `from`;
/// returns the names and the index just past the closing paren.
fn column_list(def: &str, toks: &[Token<'_>], from: usize) -> Option<(Vec<String>, usize)> {
    let open = from + toks.get(from..)?.iter().position(|t| t.kind == TokenKind::LParen)?;
    let close = matching_paren(toks, open)?;
    let inner = &def[toks[open].end()..toks[close].start];

    let names = split_top_level(inner, ',')
        .into_iter()
        .filter_map(|part| {
            tokenize(part)
                .first()
                .filter(|t| t.is_ident())
                .map(|t| t.value().into_owned())
        })
        .collect();
    Some((names, close + 1))
}

fn keywords_at(toks: &[Token<'_>], at: usize, words: &[&str]) -> bool {
    words
        .iter()
        .enumerate()
        .all(|(n, kw)| toks.get(at + n).is_some_and(|t| t.is_word(kw)))
}
