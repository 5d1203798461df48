//! Recipe short links.
//!
//! The short code is the decimal recipe id - no alphabet compression, chosen
//! for simplicity over obfuscation. Encoding builds `<base>/r/<id>/`; decoding
//! validates the code and resolves the canonical detail-page URL.

use crate::schema::recipes;
use diesel::dsl::exists;
use diesel::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortLinkError {
    #[error("Bad link format")]
    InvalidFormat,

    #[error("Recipe not found")]
    NotFound,

    #[error("Database error: {0}")]
    Db(#[from] diesel::result::Error),
}

/// Parse a short code into a recipe id. The code must be all digits.
pub fn parse_short_code(code: &str) -> Result<i32, ShortLinkError> {
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ShortLinkError::InvalidFormat);
    }
    // All-digit strings too large for i32 can't name an existing recipe
    code.parse::<i32>().map_err(|_| ShortLinkError::NotFound)
}

fn recipe_exists(conn: &mut PgConnection, recipe_id: i32) -> Result<bool, diesel::result::Error> {
    diesel::select(exists(recipes::table.find(recipe_id))).get_result(conn)
}

/// The short URL for a recipe id. Existence is the caller's concern.
pub(crate) fn short_url(base_url: &str, recipe_id: i32) -> String {
    format!("{}/r/{}/", base_url, recipe_id)
}

/// The absolute short URL for an existing recipe.
pub fn encode(
    conn: &mut PgConnection,
    base_url: &str,
    recipe_id: i32,
) -> Result<String, ShortLinkError> {
    if !recipe_exists(conn, recipe_id)? {
        return Err(ShortLinkError::NotFound);
    }
    Ok(short_url(base_url, recipe_id))
}

/// Resolve a short code back to (recipe id, canonical detail URL).
pub fn decode(
    conn: &mut PgConnection,
    base_url: &str,
    code: &str,
) -> Result<(i32, String), ShortLinkError> {
    let recipe_id = parse_short_code(code)?;
    if !recipe_exists(conn, recipe_id)? {
        return Err(ShortLinkError::NotFound);
    }
    Ok((recipe_id, format!("{}/recipes/{}/", base_url, recipe_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_code() {
        assert_eq!(parse_short_code("42").unwrap(), 42);
        assert_eq!(parse_short_code("007").unwrap(), 7);
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert!(matches!(
            parse_short_code("abc"),
            Err(ShortLinkError::InvalidFormat)
        ));
        assert!(matches!(
            parse_short_code("12a"),
            Err(ShortLinkError::InvalidFormat)
        ));
        assert!(matches!(
            parse_short_code("-5"),
            Err(ShortLinkError::InvalidFormat)
        ));
        assert!(matches!(
            parse_short_code(""),
            Err(ShortLinkError::InvalidFormat)
        ));
    }

    #[test]
    fn test_short_url_shape() {
        assert_eq!(short_url("http://example.com", 42), "http://example.com/r/42/");
        // A code round-trips through its own URL
        assert_eq!(parse_short_code("42").unwrap(), 42);
    }

    #[test]
    fn test_parse_overflowing_code_is_not_found() {
        assert!(matches!(
            parse_short_code("99999999999999999999"),
            Err(ShortLinkError::NotFound)
        ));
    }
}
