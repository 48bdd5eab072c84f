//! Declarative model parser
//!
//! Grammar-based replacement for runtime reflection: type definitions are
//! located textually, their brace-delimited bodies isolated with the shared
//! balanced scan, and each field line parsed with nom.

use std::borrow::Cow;

use nom::{
    IResult, Parser,
    bytes::complete::{escaped, is_not, tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, one_of, space0, space1},
    combinator::{opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use schemakit_types::ident::{pluralize, to_snake_name};
use schemakit_types::{Dialect, ScalarType};

use crate::error::{Result, SchemaError};
use crate::lexer::{enclosed, split_top_level};
use crate::model::{ColumnInfo, RelationInfo, RelationKind, TableInfo};
use crate::trace::schema_debug;

/// Quotes that can hide braces inside a definition body
const BODY_QUOTES: &[char] = &['`', '"'];

/// Options for declarative parsing
#[derive(Debug, Clone)]
pub struct ModelOptions {
    /// Annotation tags consulted in order when the annotation is a
    /// `tag:"..."` list
    pub tags: Vec<String>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            tags: vec!["db".to_string(), "gorm".to_string()],
        }
    }
}

/// Parse model source text with default options.
pub fn parse(text: &str, dialect: Dialect) -> Result<Vec<TableInfo>> {
    parse_with(text, dialect, &ModelOptions::default())
}

/// Parse model source text into tables, one per definition with at least one
/// column. Column types come from the scalar mapping for `dialect`.
///
/// # Errors
///
/// [`SchemaError::EmptySchema`] when the text contains no type definition at
/// all. Definitions that yield no columns are dropped without error.
pub fn parse_with(text: &str, dialect: Dialect, options: &ModelOptions) -> Result<Vec<TableInfo>> {
    let text = strip_comments(text);
    let definitions = definitions(&text);
    if definitions.is_empty() {
        return Err(SchemaError::EmptySchema { format: "model" });
    }

    let tables = definitions
        .into_iter()
        .filter_map(|(name, body)| {
            let table = build_table(name, body, dialect, options);
            if table.columns.is_empty() {
                schema_debug!(definition = name; "definition has no columns");
                return None;
            }
            Some(table)
        })
        .collect();
    Ok(tables)
}

// =============================================================================
// Combinators
// =============================================================================

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

/// `type Name struct {` or `type Name {`
fn definition_header(input: &str) -> IResult<&str, &str> {
    let (input, _) = tag("type").parse(input)?;
    let (input, _) = multispace1.parse(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0.parse(input)?;
    let (input, _) = opt(terminated(tag("struct"), multispace0)).parse(input)?;
    let (input, _) = char('{').parse(input)?;
    Ok((input, name))
}

/// Field type: `int64`, `*string`, `[]Post`, `time.Time`, `[]*Tag`
fn field_type(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '*' | '[' | ']'))
        .parse(input)
}

/// `Name Type` with an optional backtick annotation
fn field(input: &str) -> IResult<&str, RawField<'_>> {
    let (input, _) = space0.parse(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = space1.parse(input)?;
    let (input, ty) = field_type(input)?;
    let (input, _) = space0.parse(input)?;
    let (input, annotation) =
        opt(delimited(char('`'), take_until("`"), char('`'))).parse(input)?;
    Ok((
        input,
        RawField {
            name,
            ty,
            annotation: annotation.unwrap_or_default(),
        },
    ))
}

/// One `tag:"value"` pair of a tagged annotation. The value is returned
/// still escaped; see [`unescape_tag`].
fn tag_pair(input: &str) -> IResult<&str, (&str, &str)> {
    let value = opt(escaped(is_not("\\\""), '\\', one_of("\\\"")));
    let (input, (key, value)) = preceded(
        multispace0,
        pair(
            take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
            delimited(tag(":\""), value, char('"')),
        ),
    )
    .parse(input)?;
    Ok((input, (key, value.unwrap_or_default())))
}

/// Resolve `\"` and `\\` in a tag value
fn unescape_tag(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// A `default:` value: single-quoted values keep their inner text with
/// doubled quotes collapsed, anything else loses stray quotes.
fn default_value(value: &str) -> String {
    match value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => value.trim_matches(['\'', '"']).to_string(),
    }
}

/// Remove `//` line comments and `/* */` block comments outside backtick
/// and double-quoted spans. Line comments keep their newline.
fn strip_comments(text: &str) -> Cow<'_, str> {
    if !text.contains("//") && !text.contains("/*") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut open: Option<char> = None;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some(q) = open {
            if c == q {
                open = None;
            }
        } else if rest.starts_with("//") {
            let end = rest.find('\n').unwrap_or(rest.len());
            rest = &rest[end..];
            continue;
        } else if let Some(body) = rest.strip_prefix("/*") {
            rest = body.find("*/").map_or("", |end| &body[end + 2..]);
            out.push(' ');
            continue;
        } else if BODY_QUOTES.contains(&c) {
            open = Some(c);
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

// =============================================================================
// Definitions
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct RawField<'a> {
    name: &'a str,
    ty: &'a str,
    annotation: &'a str,
}

/// Every `(name, body)` definition in source order
fn definitions(text: &str) -> Vec<(&str, &str)> {
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(offset) = text[from..].find("type") {
        let pos = from + offset;
        from = pos + "type".len();

        let at_boundary = text[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        if !at_boundary {
            continue;
        }
        let Ok((_, name)) = definition_header(&text[pos..]) else {
            continue;
        };
        let Some(body) = enclosed(&text[pos..], '{', '}', BODY_QUOTES) else {
            continue;
        };
        found.push((name, &text[pos + body.start..pos + body.end]));
        from = pos + body.end;
    }
    found
}

/// Parsed annotation keys
#[derive(Debug, Default)]
struct Annotation {
    skip: bool,
    primary_key: bool,
    not_null: bool,
    column: Option<String>,
    size: Option<String>,
    sql_type: Option<String>,
    default: Option<String>,
    foreign_key: Option<String>,
    references: Option<String>,
    many2many: Option<String>,
}

impl Annotation {
    fn parse(raw: &str, options: &ModelOptions) -> Self {
        let list = if raw.contains(":\"") {
            let pairs = many0(tag_pair)
                .parse(raw)
                .map(|(_, pairs)| pairs)
                .unwrap_or_default();
            let value = options
                .tags
                .iter()
                .find_map(|t| pairs.iter().find(|(k, _)| *k == t.as_str()).map(|(_, v)| *v))
                .unwrap_or_default();
            unescape_tag(value)
        } else {
            Cow::Borrowed(raw)
        };

        let mut ann = Annotation::default();
        for item in split_top_level(&list, ';') {
            let (key, value) = match item.split_once(':') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (item, None),
            };
            let value = value.map(str::to_string);
            match key.to_ascii_lowercase().as_str() {
                "-" => ann.skip = true,
                "primarykey" | "primary_key" | "pk" => ann.primary_key = true,
                "not null" | "notnull" => ann.not_null = true,
                "column" => ann.column = value,
                "size" => ann.size = value,
                "type" => ann.sql_type = value,
                "default" => ann.default = value.as_deref().map(default_value),
                "foreignkey" => ann.foreign_key = value,
                "references" => ann.references = value,
                "many2many" => ann.many2many = value,
                _ => {}
            }
        }
        ann
    }
}

fn is_scalar(ty: &str) -> bool {
    ScalarType::from_source_type(ty).is_some()
}

/// Whether a field type names another definition rather than a column
fn is_relation(ty: &str) -> bool {
    if is_scalar(ty) {
        return false;
    }
    if let Some(elem) = ty.strip_prefix("[]") {
        return !is_scalar(elem);
    }
    if let Some(inner) = ty.strip_prefix('*') {
        return !inner.contains('.');
    }
    !ty.contains('.') && !ty.contains('[')
}

/// Referenced definition name with sequence/indirection/package stripped
fn target_type(ty: &str) -> &str {
    let ty = ty.trim_start_matches(['[', ']', '*']);
    ty.rsplit('.').next().unwrap_or(ty)
}

fn table_name(type_name: &str) -> String {
    pluralize(&to_snake_name(type_name))
}

fn build_table(name: &str, body: &str, dialect: Dialect, options: &ModelOptions) -> TableInfo {
    let fields: Vec<(RawField<'_>, Annotation)> = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("//"))
        .filter_map(|line| field(line).ok().map(|(_, f)| f))
        .map(|f| (f, Annotation::parse(f.annotation, options)))
        .filter(|(_, ann)| !ann.skip)
        .collect();

    let column_name = |field_name: &str| -> String {
        fields
            .iter()
            .find(|(f, ann)| f.name == field_name && ann.column.is_some())
            .and_then(|(_, ann)| ann.column.clone())
            .unwrap_or_else(|| to_snake_name(field_name))
    };

    let mut table = TableInfo::new(table_name(name));

    for (field, ann) in fields.iter().filter(|(f, _)| !is_relation(f.ty)) {
        let scalar = ScalarType::from_source_type(field.ty).unwrap_or(ScalarType::Text);
        let sql_type = match (&ann.sql_type, &ann.size) {
            (Some(ty), _) => ty.clone(),
            (None, Some(size)) if scalar == ScalarType::Text => format!("VARCHAR({size})"),
            _ => scalar.sql_type(dialect).to_string(),
        };

        let mut col = ColumnInfo::new(column_name(field.name), sql_type);
        col.source_type = Some(field.ty.to_string());
        col.default = ann.default.clone();
        if ann.not_null {
            col.is_nullable = false;
        }
        if ann.primary_key {
            col.set_primary_key();
        }
        table.columns.push(col);
    }

    if !table.columns.iter().any(|c| c.is_primary_key) {
        if let Some(id) = table.column_mut("id") {
            id.set_primary_key();
        }
    }

    for (field, ann) in fields.iter().filter(|(f, _)| is_relation(f.ty)) {
        let target = target_type(field.ty);
        let target_table = table_name(target);
        let holds_key = |f: &str| fields.iter().any(|(o, _)| o.name == f);

        let relation = if field.ty.starts_with("[]") {
            match &ann.many2many {
                Some(join) => RelationInfo {
                    name: field.name.to_string(),
                    kind: RelationKind::ToManyThrough,
                    table: target_table,
                    foreign_key: ann.foreign_key.as_deref().map(to_snake_name),
                    reference_key: ann.references.as_deref().map(to_snake_name),
                    join_table: Some(join.clone()),
                },
                None => RelationInfo {
                    name: field.name.to_string(),
                    kind: RelationKind::ToMany,
                    table: target_table,
                    foreign_key: Some(
                        ann.foreign_key
                            .as_deref()
                            .map(to_snake_name)
                            .unwrap_or_else(|| format!("{}_id", to_snake_name(name))),
                    ),
                    reference_key: ann.references.as_deref().map(to_snake_name),
                    join_table: None,
                },
            }
        } else {
            let local_key = ann
                .foreign_key
                .clone()
                .unwrap_or_else(|| format!("{}ID", field.name));
            if holds_key(&local_key) {
                let column = column_name(&local_key);
                let reference = ann
                    .references
                    .as_deref()
                    .map(to_snake_name)
                    .unwrap_or_else(|| "id".to_string());
                if let Some(col) = table.column_mut(&column) {
                    col.set_reference(&target_table, Some(&reference));
                }
                RelationInfo {
                    name: field.name.to_string(),
                    kind: RelationKind::OwningToOne,
                    table: target_table,
                    foreign_key: Some(column),
                    reference_key: Some(reference),
                    join_table: None,
                }
            } else {
                RelationInfo {
                    name: field.name.to_string(),
                    kind: RelationKind::OwnedToOne,
                    table: target_table,
                    foreign_key: Some(
                        ann.foreign_key
                            .as_deref()
                            .map(to_snake_name)
                            .unwrap_or_else(|| format!("{}_id", to_snake_name(name))),
                    ),
                    reference_key: ann.references.as_deref().map(to_snake_name),
                    join_table: None,
                }
            }
        };
        table.relations.push(relation);
    }

    table.rebuild_primary_keys();
    table
}
