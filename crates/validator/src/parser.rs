//! Rule-chain declaration parser.
//!
//! A declaration is a `|`-separated list of rule tokens:
//!
//! ```text
//! required|min(10)|between(1,20)|trim()
//! ```
//!
//! Each token is a bare name, `name()` (explicit empty arguments), or
//! `name(a,b,c)`. Arguments are kept verbatim, whitespace included, so
//! `starts_with( x)` matches a leading space; there is no quoting and no
//! nesting.

use smallvec::SmallVec;

/// Arguments of a single rule; rules rarely take more than two.
pub type RuleArgs = SmallVec<[String; 2]>;

/// One parsed `name(args)` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDeclaration {
    /// Rule name as looked up in the registry.
    pub name: String,
    /// Static arguments in declaration order.
    pub args: RuleArgs,
}

impl RuleDeclaration {
    /// Creates a declaration with no arguments.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: RuleArgs::new(),
        }
    }
}

/// Why a declaration string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The declaration is empty or only whitespace.
    #[error("empty declaration")]
    Empty,

    /// Two separators with nothing between them, or a trailing separator.
    #[error("empty rule at position {position}")]
    EmptyToken {
        /// Zero-based index of the token in the chain.
        position: usize,
    },

    /// A token such as `(10)` with no rule name.
    #[error("rule `{token}` has no name")]
    EmptyName {
        /// The offending token.
        token: String,
    },

    /// Parentheses do not pair up.
    #[error("unbalanced parentheses in `{token}`")]
    Unbalanced {
        /// The offending token.
        token: String,
    },

    /// Parentheses inside an argument list.
    #[error("nested parentheses are not supported in `{token}`")]
    Nested {
        /// The offending token.
        token: String,
    },

    /// Text after the closing parenthesis.
    #[error("unexpected input after `)` in `{token}`")]
    TrailingInput {
        /// The offending token.
        token: String,
    },
}

/// Parses a full rule chain.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::parser::parse_chain;
///
/// let chain = parse_chain("required|min(10)")?;
/// assert_eq!(chain[1].name, "min");
/// assert_eq!(chain[1].args.as_slice(), ["10"]);
/// ```
pub fn parse_chain(source: &str) -> Result<Vec<RuleDeclaration>, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    source
        .split('|')
        .enumerate()
        .map(|(position, token)| parse_token(token.trim(), position))
        .collect()
}

/// Parses a single `name`, `name()` or `name(a,b)` token.
pub fn parse_token(token: &str, position: usize) -> Result<RuleDeclaration, ParseError> {
    if token.is_empty() {
        return Err(ParseError::EmptyToken { position });
    }

    let Some(open) = token.find('(') else {
        if token.contains(')') {
            return Err(ParseError::Unbalanced {
                token: token.to_owned(),
            });
        }
        return Ok(RuleDeclaration::bare(token));
    };

    let Some(close) = token.rfind(')') else {
        return Err(ParseError::Unbalanced {
            token: token.to_owned(),
        });
    };

    if close < open {
        return Err(ParseError::Unbalanced {
            token: token.to_owned(),
        });
    }
    if close != token.len() - 1 {
        return Err(ParseError::TrailingInput {
            token: token.to_owned(),
        });
    }

    let inner = &token[open + 1..close];
    if inner.contains(['(', ')']) {
        return Err(ParseError::Nested {
            token: token.to_owned(),
        });
    }

    let name = token[..open].trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName {
            token: token.to_owned(),
        });
    }

    let args = if inner.trim().is_empty() {
        RuleArgs::new()
    } else {
        inner.split(',').map(str::to_owned).collect()
    };

    Ok(RuleDeclaration {
        name: name.to_owned(),
        args,
    })
}

/// Splits a comma-separated list (triggers), trimming entries and dropping
/// empty ones.
pub fn parse_list(source: &str) -> impl Iterator<Item = &str> {
    source.split(',').map(str::trim).filter(|s| !s.is_empty())
}
