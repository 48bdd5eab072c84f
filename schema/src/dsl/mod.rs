//! Compact table-notation schemas
//!
//! ```text
//! Table users {
//!   id integer [pk]
//!   email varchar(255) [not null]
//! }
//!
//! Table posts {
//!   id integer [pk]
//!   author_id integer [ref: > users.id]
//! }
//!
//! Ref: posts.editor_id > users.id
//! ```

mod generate;
mod parser;

pub use generate::generate;
pub use parser::parse;

/// Split a possibly double-quoted leading name off `s`.
///
/// Returns the unquoted name and the remainder after it. A bare name ends at
/// whitespace, `{` or `[`.
pub(crate) fn take_name(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('"') {
        let end = rest.find('"')?;
        return Some((&rest[..end], &rest[end + 1..]));
    }
    let end = s
        .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
        .unwrap_or(s.len());
    let name = s[..end].trim_matches('`');
    (!name.is_empty()).then_some((name, &s[end..]))
}

/// Whether `name` needs quoting to survive [`take_name`]
pub(crate) fn needs_quotes(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}
