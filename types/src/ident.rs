//! Identifier utilities
//!
//! Case conversion between table/column names and declarative type/field
//! names, plus the naive English singular/plural rules used to move between
//! table names (`users`) and type names (`User`).

use heck::ToSnakeCase;

/// Words rendered fully upper-case in type and field names
const ACRONYMS: &[&str] = &[
    "id", "url", "api", "ip", "http", "https", "sql", "ssh", "uuid", "uri", "html", "css", "json",
    "xml", "cpu", "gpu",
];

/// Convert a table or column name into a type/field name.
///
/// Words are split on case boundaries and separators, each word is
/// capitalized, and well-known acronyms are upper-cased whole.
///
/// ```
/// use schemakit_types::ident::to_pascal_name;
///
/// assert_eq!(to_pascal_name("user_id"), "UserID");
/// assert_eq!(to_pascal_name("api_key"), "APIKey");
/// assert_eq!(to_pascal_name("created_at"), "CreatedAt");
/// ```
#[must_use]
pub fn to_pascal_name(name: &str) -> String {
    let snake = name.to_snake_case();
    let mut out = String::with_capacity(snake.len());
    for word in snake.split('_').filter(|w| !w.is_empty()) {
        if ACRONYMS.contains(&word) {
            out.push_str(&word.to_ascii_uppercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Convert a type or field name into a lower/underscore table or column name.
///
/// ```
/// use schemakit_types::ident::to_snake_name;
///
/// assert_eq!(to_snake_name("AuthorID"), "author_id");
/// assert_eq!(to_snake_name("CreatedAt"), "created_at");
/// ```
#[must_use]
pub fn to_snake_name(name: &str) -> String {
    name.to_snake_case()
}

/// Naive English singular form of a plural table name.
///
/// `ies` becomes `y`, `ses`/`xes`/`zes` drop `es`, and a trailing `s` (but
/// not `ss`) is dropped. Anything else is returned unchanged.
#[must_use]
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["ses", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Naive English plural form, the inverse of [`singularize`] for the
/// shapes it recognizes.
#[must_use]
pub fn pluralize(word: &str) -> String {
    let consonant_y = word.ends_with('y')
        && word
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| !"aeiouAEIOU".contains(c));
    if consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if word.ends_with('s') || word.ends_with('x') || word.ends_with('z') {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_acronyms() {
        assert_eq!(to_pascal_name("id"), "ID");
        assert_eq!(to_pascal_name("avatar_url"), "AvatarURL");
        assert_eq!(to_pascal_name("user"), "User");
        assert_eq!(to_pascal_name("order_items"), "OrderItems");
        assert_eq!(to_pascal_name("json_data"), "JSONData");
    }

    #[test]
    fn test_snake_name() {
        assert_eq!(to_snake_name("ID"), "id");
        assert_eq!(to_snake_name("Name"), "name");
        assert_eq!(to_snake_name("OrderItem"), "order_item");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("glass"), "glass");
        assert_eq!(singularize("sheep"), "sheep");
    }

    #[test]
    fn test_pluralize_inverts_singularize() {
        for word in ["user", "category", "address", "box", "post_tag", "day"] {
            assert_eq!(singularize(&pluralize(word)), word, "{word}");
        }
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("category"), "categories");
    }
}
