use std::fmt;

/// Upper bound on tokens per command line, program name included.
pub const MAX_TOKENS: usize = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum TokenizeError {
    TooManyTokens { limit: usize },
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::TooManyTokens { limit } => {
                write!(f, "too many arguments: at most {} tokens per command", limit)
            }
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Splits a line (trailing newline already stripped) on runs of spaces.
///
/// Returns the tokens in original order; element 0 is the command name.
/// A blank or delimiter-only line yields an empty vector, which the caller
/// treats as "reprompt", not as an error. Exceeding [`MAX_TOKENS`] is
/// reported rather than truncated.
pub fn tokenize(line: &str) -> Result<Vec<&str>, TokenizeError> {
    let mut tokens = Vec::new();

    for token in line.split(' ').filter(|t| !t.is_empty()) {
        if tokens.len() == MAX_TOKENS {
            return Err(TokenizeError::TooManyTokens { limit: MAX_TOKENS });
        }
        tokens.push(token);
    }

    Ok(tokens)
}
