//! Named-to-positional SQL parameter translation.
//!
//! SQL templates use `$name` placeholders. [`to_positional`] rewrites each
//! placeholder that sits outside a quoted region into a `?` marker and
//! collects the bound values in the order the markers appear.
//!
//! This is a best-effort tokenizer, not a SQL grammar: it tracks only
//! single, double, and back-quoted regions. A doubled quote character
//! inside a region of the same kind is an escaped literal. An unterminated
//! region runs to the end of the input without error.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use rockup_sync_core::to_positional;
//!
//! let params = HashMap::from([("foo".to_string(), 1), ("bar".to_string(), 2)]);
//! let converted = to_positional("SELECT * FROM demo WHERE a = $foo AND b = $bar", &params).unwrap();
//! assert_eq!(converted.sql, "SELECT * FROM demo WHERE a = ? AND b = ?");
//! assert_eq!(converted.params, vec![&1, &2]);
//! ```

use std::collections::HashMap;

use crate::error::{Result, ValidationError};

/// Marker substituted for every translated placeholder.
pub const POSITIONAL_MARKER: char = '?';

/// SQL rewritten with positional markers, plus the values to bind.
///
/// `params[i]` binds to the `i`-th marker in `sql`.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalSql<'p, V> {
    pub sql: String,
    pub params: Vec<&'p V>,
}

/// Rewrites `$name` placeholders in `sql` into positional markers.
///
/// A name used several times contributes one entry per occurrence.
///
/// # Errors
///
/// - [`ValidationError::InvalidPlaceholder`] when a `$` outside quotes is
///   not followed by `[A-Za-z_][A-Za-z0-9_]*`.
/// - [`ValidationError::MissingParameter`] when the name is not in `params`.
pub fn to_positional<'p, V>(
    sql: &str,
    params: &'p HashMap<String, V>,
) -> Result<PositionalSql<'p, V>> {
    let mut converted = String::with_capacity(sql.len());
    let mut bound = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if let Some(active) = quote {
            converted.push(ch);
            if ch == active {
                if chars.next_if(|&(_, next)| next == active).is_some() {
                    converted.push(active);
                } else {
                    quote = None;
                }
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                converted.push(ch);
            }
            '$' => {
                let name = placeholder_name(&sql[pos + 1..])
                    .ok_or(ValidationError::InvalidPlaceholder { position: pos })?;
                let value = params
                    .get(name)
                    .ok_or_else(|| ValidationError::MissingParameter(name.to_string()))?;
                bound.push(value);
                converted.push(POSITIONAL_MARKER);
                // Identifiers are ASCII, so one char per byte.
                for _ in 0..name.len() {
                    chars.next();
                }
            }
            _ => converted.push(ch),
        }
    }

    Ok(PositionalSql {
        sql: converted,
        params: bound,
    })
}

/// Returns the identifier at the start of `rest`, if any.
fn placeholder_name(rest: &str) -> Option<&str> {
    let mut end = 0;
    for (i, byte) in rest.bytes().enumerate() {
        let valid = if i == 0 {
            byte.is_ascii_alphabetic() || byte == b'_'
        } else {
            byte.is_ascii_alphanumeric() || byte == b'_'
        };
        if !valid {
            break;
        }
        end = i + 1;
    }
    (end > 0).then(|| &rest[..end])
}
