//! Line-oriented table-notation parser

use crate::error::{Result, SchemaError};
use crate::lexer::split_top_level;
use crate::model::{ColumnInfo, TableInfo};
use crate::trace::schema_debug;

use super::take_name;

const QUOTES: [char; 3] = ['\'', '"', '`'];

/// Parse table-notation text into tables, in declaration order.
///
/// A single top-to-bottom pass: a top-level `Ref:` line only affects tables
/// already closed above it. Blocks other than `Table` (project settings,
/// enums, table groups) and nested blocks inside a table (`indexes`, `Note`)
/// are skipped.
///
/// # Errors
///
/// [`SchemaError::EmptySchema`] when no table block is found.
pub fn parse(text: &str) -> Result<Vec<TableInfo>> {
    let mut tables: Vec<TableInfo> = Vec::new();
    let mut current: Option<TableInfo> = None;
    let mut skip_depth = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if skip_depth > 0 {
            skip_depth += line.matches('{').count();
            skip_depth = skip_depth.saturating_sub(line.matches('}').count());
            continue;
        }

        if let Some(body) = ref_body(line) {
            apply_ref(body, &mut tables);
            continue;
        }

        match current.as_mut() {
            None => {
                if let Some(name) = table_header(line) {
                    current = Some(TableInfo::new(name));
                } else if line.ends_with('{') {
                    skip_depth = 1;
                }
            }
            Some(table) => {
                if line.starts_with('}') {
                    if let Some(mut done) = current.take() {
                        done.rebuild_primary_keys();
                        tables.push(done);
                    }
                } else if line.ends_with('{') {
                    skip_depth = 1;
                } else if line.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("note:")) {
                    // table note
                } else if let Some(col) = parse_column(line) {
                    table.columns.push(col);
                }
            }
        }
    }

    if tables.is_empty() {
        return Err(SchemaError::EmptySchema { format: "dsl" });
    }
    Ok(tables)
}

/// `Table <name> [settings] {`
fn table_header(line: &str) -> Option<String> {
    let rest = line
        .get(..6)
        .filter(|p| p.eq_ignore_ascii_case("table "))
        .map(|_| &line[6..])?;
    if !rest.contains('{') {
        return None;
    }
    take_name(rest).map(|(name, _)| name.to_string())
}

/// `name type [attr, attr, ...]`
fn parse_column(line: &str) -> Option<ColumnInfo> {
    let (name, rest) = take_name(line)?;
    let (type_part, attrs) = match attribute_block(rest) {
        Some((open, close)) => (&rest[..open], &rest[open + 1..close]),
        None => (rest, ""),
    };

    let sql_type = type_part.split_whitespace().collect::<Vec<_>>().join(" ");
    let sql_type = sql_type.trim_matches('"');
    if sql_type.is_empty() {
        return None;
    }

    let mut col = ColumnInfo::new(name, sql_type);
    for attr in split_top_level(attrs, ',') {
        let lower = attr.to_ascii_lowercase();
        match lower.as_str() {
            "pk" | "primary key" => col.set_primary_key(),
            "not null" => col.is_nullable = false,
            _ if lower.starts_with("default:") => {
                let value = attr["default:".len()..].trim().trim_matches(QUOTES);
                col.default = Some(value.to_string());
            }
            _ if lower.starts_with("ref:") => {
                let target = attr["ref:".len()..]
                    .trim()
                    .trim_start_matches(['>', '<', '-'])
                    .trim();
                match target.rsplit_once('.') {
                    Some((table, column)) => col.set_reference(table, Some(column)),
                    None => col.set_reference(target, None),
                }
            }
            _ => {}
        }
    }
    Some(col)
}

/// Byte range of the `[...]` attribute list in the text after a column
/// name. The list opens at a `[` that follows whitespace, so array types
/// such as `text[]` stay part of the type.
fn attribute_block(rest: &str) -> Option<(usize, usize)> {
    let open = rest
        .char_indices()
        .find(|&(i, c)| c == '[' && rest[..i].ends_with(char::is_whitespace))
        .map(|(i, _)| i)?;
    let close = rest.rfind(']').filter(|&close| close > open)?;
    Some((open, close))
}

/// Body of a `Ref:` / `Ref name:` line
fn ref_body(line: &str) -> Option<&str> {
    let rest = line
        .get(..3)
        .filter(|p| p.eq_ignore_ascii_case("ref"))
        .map(|_| &line[3..])?;
    let (label, body) = rest.split_once(':')?;
    let plain_label = label.is_empty()
        || (label.starts_with(char::is_whitespace) && label.split_whitespace().count() <= 1);
    plain_label.then_some(body.trim())
}

/// Mark the left-hand column of `a.x > b.y` in an already closed table as
/// referencing the right-hand side.
///
/// The operator only describes cardinality: `>`, `<` and `-` all mark the
/// left column. `<>` is ignored.
fn apply_ref(body: &str, tables: &mut [TableInfo]) {
    let body = body.split('[').next().unwrap_or_default().trim();
    if body.contains("<>") {
        return;
    }

    let Some((from, to)) = [" > ", " < ", " - "]
        .into_iter()
        .find_map(|op| body.split_once(op).map(|(l, r)| (l.trim(), r.trim())))
    else {
        return;
    };

    let Some((from_table, from_col)) = from.rsplit_once('.') else {
        return;
    };
    let (to_table, to_col) = match to.rsplit_once('.') {
        Some((t, c)) => (t, Some(c)),
        None => (to, None),
    };

    let unquote = |s: &str| s.trim().trim_matches(QUOTES).to_string();
    let from_table = unquote(from_table);
    let from_col = unquote(from_col);
    let to_table = unquote(to_table);
    let to_col = to_col.map(unquote);

    let target = tables
        .iter_mut()
        .find(|t| t.name.eq_ignore_ascii_case(&from_table))
        .and_then(|t| t.column_mut(&from_col));

    match target {
        Some(col) => col.set_reference(&to_table, to_col.as_deref()),
        None => schema_debug!(table = from_table, column = from_col; "ref matched no closed table"),
    }
}
