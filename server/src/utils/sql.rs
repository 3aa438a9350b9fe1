//! SQL utility functions

/// Build a safe FTS5 MATCH expression from free-form user input
///
/// Splits the input into alphanumeric tokens, quotes each one as an FTS5
/// string, and joins them with `OR`. Quoting neutralises FTS5 operators
/// (`AND`, `NEAR`, `*`, `:`, column filters) that users might type.
/// Returns `None` when the input contains no searchable tokens.
///
/// # Example
///
/// ```
/// use parkspot_server::utils::sql::fts5_match_query;
///
/// assert_eq!(
///     fts5_match_query("covered garage").as_deref(),
///     Some("\"covered\" OR \"garage\"")
/// );
/// assert_eq!(fts5_match_query("!!"), None);
/// ```
pub fn fts5_match_query(input: &str) -> Option<String> {
    let tokens: Vec<String> = input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"", t))
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" OR "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fts5_match_query_single_word() {
        assert_eq!(fts5_match_query("garage").as_deref(), Some("\"garage\""));
    }

    #[test]
    fn test_fts5_match_query_multiple_words() {
        assert_eq!(
            fts5_match_query("downtown  covered garage").as_deref(),
            Some("\"downtown\" OR \"covered\" OR \"garage\"")
        );
    }

    #[test]
    fn test_fts5_match_query_strips_operators() {
        assert_eq!(
            fts5_match_query("title:garage* NEAR(\"x\")").as_deref(),
            Some("\"title\" OR \"garage\" OR \"NEAR\" OR \"x\"")
        );
    }

    #[test]
    fn test_fts5_match_query_keeps_unicode_letters() {
        assert_eq!(fts5_match_query("café").as_deref(), Some("\"café\""));
    }

    #[test]
    fn test_fts5_match_query_empty() {
        assert_eq!(fts5_match_query(""), None);
        assert_eq!(fts5_match_query("   "), None);
        assert_eq!(fts5_match_query("-- ;"), None);
    }
}
