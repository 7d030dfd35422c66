//! Shell-style tokenizer for terminal input.
//!
//! Understands single quotes (literal), double quotes (with `\"` and `\\`
//! escapes), backslash escapes outside quotes, and unquoted `>` / `>>`
//! redirections. A `>` inside quotes is ordinary text.

use crate::error::{Result, SandboxError};

/// Output redirection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// `>`: replace file content.
    Truncate,
    /// `>>`: append to file content.
    Append,
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word after quote removal.
    Word(String),
    /// An unquoted redirection operator.
    Redirect(Redirect),
}

impl Token {
    /// The word text, or `None` for operators.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(w) => Some(w),
            Self::Redirect(_) => None,
        }
    }
}

/// Splits one input line into tokens.
///
/// # Errors
///
/// Returns `UnterminatedQuote` when a quote is left open.
///
/// # Examples
///
/// ```
/// use sandbox_core::{tokenize, Token};
///
/// let tokens = tokenize(r#"git commit -m "fix: a > b""#).unwrap();
/// assert_eq!(tokens.last(), Some(&Token::Word("fix: a > b".to_string())));
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    // Distinguishes `""` (an empty word) from no word at all
    let mut in_word = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                flush(&mut tokens, &mut word, &mut in_word);
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => word.push(ch),
                        None => return Err(SandboxError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(esc @ ('"' | '\\')) => word.push(esc),
                            Some('n') => word.push('\n'),
                            Some(other) => {
                                word.push('\\');
                                word.push(other);
                            }
                            None => return Err(SandboxError::UnterminatedQuote('"')),
                        },
                        Some(ch) => word.push(ch),
                        None => return Err(SandboxError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(next) = chars.next() {
                    word.push(next);
                }
            }
            '>' => {
                flush(&mut tokens, &mut word, &mut in_word);
                if chars.peek() == Some(&'>') {
                    chars.next();
                    tokens.push(Token::Redirect(Redirect::Append));
                } else {
                    tokens.push(Token::Redirect(Redirect::Truncate));
                }
            }
            other => {
                in_word = true;
                word.push(other);
            }
        }
    }

    flush(&mut tokens, &mut word, &mut in_word);
    Ok(tokens)
}

fn flush(tokens: &mut Vec<Token>, word: &mut String, in_word: &mut bool) {
    if *in_word {
        tokens.push(Token::Word(std::mem::take(word)));
        *in_word = false;
    }
}
