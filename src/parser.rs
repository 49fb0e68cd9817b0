//! Cursor-style recursive-descent parser for the expression language.
//!
//! Every production is a pure function from an input slice (plus the filter
//! mode flag) to a parsed node and the unconsumed remainder. Nothing is
//! mutated: the caller feeds the remainder back into the surrounding
//! tokenizer. Binary operators combine by precedence climbing against the
//! table in [`BinOp::precedence`]; expression terminators (`) } ; , ]`) act
//! as precedence-0 tokens and stop the climb.
//!
//! ```
//! use stencil_expr::parse_expression;
//!
//! let (expr, rest) = parse_expression("1 + 2 * 3}}", false).unwrap();
//! assert_eq!(rest, "}}");
//! assert_eq!(expr.to_raw_string(), "1 + 2 * 3");
//! ```

use crate::ast::{BinOp, Expr, Property, UnaryOp};
use crate::chars;
use crate::value::Value;
use std::fmt;

/// A malformed construct in the source text.
///
/// Raised synchronously at the first error; the parse call produces no
/// partial AST. The message carries up to 50 characters of the offending
/// source as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    fn syntax(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

const CONTEXT_CHARS: usize = 50;

/// Up to 50 characters of source context for error messages.
fn ellipsize(input: &str) -> String {
    let mut out: String = input.chars().take(CONTEXT_CHARS).collect();
    if input.chars().nth(CONTEXT_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

fn skip_ws(input: &str) -> &str {
    input.trim_start()
}

/// Longest-match-first operator table; multi-character tokens come before
/// their single-character prefixes.
const OPERATOR_TOKENS: &[(&str, BinOp)] = &[
    ("!==", BinOp::StrictNotEqual),
    ("===", BinOp::StrictEqual),
    (">=", BinOp::GreaterEqual),
    ("<=", BinOp::LessEqual),
    ("!=", BinOp::NotEqual),
    ("==", BinOp::Equal),
    ("&&", BinOp::And),
    ("||", BinOp::Or),
    ("<<", BinOp::ShiftLeft),
    (">>", BinOp::ShiftRight),
    (">", BinOp::GreaterThan),
    ("<", BinOp::LessThan),
    ("=", BinOp::Assign),
    ("+", BinOp::Add),
    ("-", BinOp::Subtract),
    ("*", BinOp::Multiply),
    ("/", BinOp::Divide),
    ("%", BinOp::Modulo),
    ("&", BinOp::BitAnd),
    ("|", BinOp::BitOr),
    ("^", BinOp::BitXor),
];

/// Parses one expression from the head of `input`.
///
/// Returns the parsed node and the unconsumed remainder of the slice.
/// `filter_expression` enables the whitespace-sensitive call form
/// (`name: raw text…`) for the leading operand only; nested
/// sub-expressions always parse with it off.
pub fn parse_expression(input: &str, filter_expression: bool) -> Result<(Expr, &str), ParseError> {
    let (left, rest) = parse_unary(input, filter_expression)?;
    parse_binary(left, rest, 0)
}

/// Precedence climbing: combine `left` with operators binding more tightly
/// than `min_precedence`.
fn parse_binary(mut left: Expr, mut input: &str, min_precedence: u8) -> Result<(Expr, &str), ParseError> {
    loop {
        match peek_operator(input)? {
            Some((op, rest)) if op.precedence() > min_precedence => {
                let (operand, rest) = parse_unary(rest, false)?;
                let (right, rest) = parse_binary(operand, rest, op.precedence())?;
                left = Expr::binary(op, left, right);
                input = rest;
            }
            _ => return Ok((left, input)),
        }
    }
}

/// Scans a binary operator at the head of `input`, without committing:
/// `None` means the expression ends here (end of input, terminator, or a
/// token that is not a binary operator).
fn peek_operator(input: &str) -> Result<Option<(BinOp, &str)>, ParseError> {
    let input = skip_ws(input);
    let first = match input.chars().next() {
        Some(c) => c,
        None => return Ok(None),
    };
    if chars::is_terminator(first) {
        return Ok(None);
    }
    if chars::is_operator_char(first) {
        for (token, op) in OPERATOR_TOKENS {
            if input.starts_with(token) {
                return Ok(Some((*op, &input[token.len()..])));
            }
        }
        // lone '!' is the unary operator; it never combines
        return Ok(None);
    }
    if chars::is_ident_start(first) {
        let (word, rest) = scan_identifier(input)?;
        return Ok(match word {
            "and" => Some((BinOp::And, rest)),
            "or" => Some((BinOp::Or, rest)),
            _ => None,
        });
    }
    Ok(None)
}

/// A leading `-`, `!`, or `+` applies as a unary operator to the operand
/// that follows it.
fn parse_unary(input: &str, filter_expression: bool) -> Result<(Expr, &str), ParseError> {
    let input = skip_ws(input);
    let op = match input.chars().next() {
        Some('-') => Some(UnaryOp::Minus),
        Some('!') => Some(UnaryOp::Not),
        Some('+') => Some(UnaryOp::Plus),
        _ => None,
    };
    match op {
        Some(op) => {
            let (operand, rest) = parse_unary(&input[1..], false)?;
            Ok((Expr::unary(op, operand), rest))
        }
        None => parse_token(input, filter_expression),
    }
}

/// Parses a single operand: a group, literal, array or object literal,
/// identifier, member chain, or call expression.
fn parse_token(input: &str, filter_expression: bool) -> Result<(Expr, &str), ParseError> {
    let input = skip_ws(input);
    let first = match input.chars().next() {
        Some(c) => c,
        None => return Err(ParseError::syntax("Expected token before end of input")),
    };

    match first {
        '(' => {
            let (expr, rest) = parse_expression(&input[1..], false)?;
            let rest = skip_ws(rest);
            match rest.chars().next() {
                Some(')') => Ok((expr, &rest[1..])),
                Some(c) => Err(ParseError::syntax(format!(
                    "Expected ')' but instead found '{}': {}",
                    c,
                    ellipsize(rest)
                ))),
                None => Err(ParseError::syntax(format!(
                    "Expected ')' before end of input: {}",
                    ellipsize(input)
                ))),
            }
        }
        '\'' | '"' | '`' | '′' => parse_string(input, first),
        c if c.is_ascii_digit() => parse_number(input),
        '{' => parse_object(&input[1..]),
        '[' => {
            let (elements, rest) = parse_arguments(&input[1..], ']')?;
            Ok((Expr::Array(elements), rest))
        }
        c if chars::is_operator_char(c) => Err(ParseError::syntax(format!(
            "Invalid operator found near: '{}'",
            ellipsize(input)
        ))),
        _ => parse_identifier_token(input, filter_expression),
    }
}

/// String literal: delimited by `'`, `"`, a backtick, or the unicode prime;
/// the delimiter may be escaped with a preceding backslash. Escape
/// processing strips a backslash only when it immediately precedes the
/// delimiter character.
fn parse_string(input: &str, quote: char) -> Result<(Expr, &str), ParseError> {
    let body = &input[quote.len_utf8()..];
    let mut prev = quote;
    let mut has_escape = false;
    let mut end = None;
    for (idx, c) in body.char_indices() {
        if c == quote && prev != '\\' {
            end = Some(idx);
            break;
        }
        if c == '\\' {
            has_escape = true;
        }
        prev = c;
    }
    let end = match end {
        Some(i) => i,
        None => {
            return Err(ParseError::syntax(format!(
                "Unterminated string literal: {}",
                ellipsize(input)
            )))
        }
    };

    let raw = &body[..end];
    let text = if has_escape {
        strip_quote_escapes(raw, quote)
    } else {
        raw.to_string()
    };
    Ok((
        Expr::Literal(Value::String(text)),
        &body[end + quote.len_utf8()..],
    ))
}

fn strip_quote_escapes(raw: &str, quote: char) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut iter = raw.chars().peekable();
    while let Some(c) = iter.next() {
        if c == '\\' && iter.peek() == Some(&quote) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Numeric literal: digits and `.` accumulate; `e`/`E` introduces an
/// exponent that consumes one sign-or-digit slot plus any further digits.
/// Without a decimal point or exponent the literal is a 64-bit signed
/// integer, otherwise a 64-bit float.
fn parse_number(input: &str) -> Result<(Expr, &str), ParseError> {
    let bytes = input.as_bytes();
    let mut i = 1;
    let mut has_exponent = false;
    let mut has_decimal = false;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if chars::is_numeric_char(c) {
            if c == '.' {
                has_decimal = true;
            }
            i += 1;
        } else if c == 'e' || c == 'E' {
            has_exponent = true;
            i += 1;
            // one sign-or-digit slot, then any further digits
            if i < bytes.len() {
                i += 1;
            }
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            break;
        } else {
            break;
        }
    }

    let text = &input[..i];
    let token = if has_decimal || has_exponent {
        // lenient: a malformed float literal evaluates as zero
        Expr::Literal(Value::Float(text.parse::<f64>().unwrap_or(0.0)))
    } else {
        match text.parse::<i64>() {
            Ok(n) => Expr::Literal(Value::Integer(n)),
            Err(_) => {
                return Err(ParseError::syntax(format!(
                    "Integer literal out of range: {}",
                    text
                )))
            }
        }
    };
    Ok((token, &input[i..]))
}

/// Object literal body, after the opening `{`. Keys must parse to a literal
/// or identifier; `key: value` and shorthand `key` entries mix freely and a
/// trailing comma is tolerated.
fn parse_object(mut input: &str) -> Result<(Expr, &str), ParseError> {
    let mut properties = Vec::new();

    loop {
        input = skip_ws(input);
        if let Some(rest) = input.strip_prefix('}') {
            input = rest;
            break;
        }
        if input.is_empty() {
            return Err(ParseError::syntax("Unterminated object literal before end of input"));
        }

        let (key, rest) = parse_token(input, false)?;
        if !matches!(key, Expr::Literal(_) | Expr::Identifier(_)) {
            return Err(ParseError::syntax(format!(
                "'{}' is not a valid object key, expected literal or identifier",
                key
            )));
        }

        let mut rest = skip_ws(rest);
        let value;
        let shorthand;
        if let Some(after) = rest.strip_prefix(':') {
            let (v, r) = parse_expression(after, false)?;
            value = v;
            shorthand = false;
            rest = r;
        } else {
            match rest.chars().next() {
                Some(',') | Some('}') => {}
                _ => {
                    return Err(ParseError::syntax(format!(
                        "Unterminated object literal near: {}",
                        ellipsize(rest)
                    )))
                }
            }
            value = key.clone();
            shorthand = true;
        }
        properties.push(Property::new(key, value, shorthand));

        let rest = skip_ws(rest);
        match rest.chars().next() {
            Some('}') => {
                input = &rest[1..];
                break;
            }
            Some(',') => {
                input = &rest[1..];
            }
            _ => {
                return Err(ParseError::syntax(format!(
                    "Unterminated object literal near: {}",
                    ellipsize(rest)
                )))
            }
        }
    }

    Ok((Expr::Object(properties), input))
}

/// Comma-separated sub-expressions up to `termination`, shared by array
/// literals (`]`) and call arguments (`)`). `input` starts just past the
/// opener.
fn parse_arguments(mut input: &str, termination: char) -> Result<(Vec<Expr>, &str), ParseError> {
    let mut arguments = Vec::new();

    loop {
        input = skip_ws(input);
        if let Some(rest) = input.strip_prefix(termination) {
            return Ok((arguments, rest));
        }
        if input.is_empty() {
            return Err(ParseError::syntax(format!(
                "Unterminated arguments expression, expected '{}' before end of input",
                termination
            )));
        }

        let (value, rest) = parse_expression(input, false)?;
        arguments.push(value);

        let rest = skip_ws(rest);
        match rest.chars().next() {
            Some(c) if c == termination => return Ok((arguments, &rest[c.len_utf8()..])),
            Some(',') => {
                input = &rest[1..];
            }
            _ => {
                return Err(ParseError::syntax(format!(
                    "Unterminated arguments expression near: {}",
                    ellipsize(rest)
                )))
            }
        }
    }
}

/// Scans one identifier: a letter or underscore, then letters, digits, and
/// underscores.
fn scan_identifier(input: &str) -> Result<(&str, &str), ParseError> {
    let input = skip_ws(input);
    let first = match input.chars().next() {
        Some(c) => c,
        None => return Err(ParseError::syntax("Expected identifier before end of input")),
    };
    if !chars::is_ident_start(first) {
        return Err(ParseError::syntax(format!(
            "Expected start of identifier but was '{}'",
            first
        )));
    }
    let end = input
        .char_indices()
        .find(|(_, c)| !chars::is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    Ok((&input[..end], &input[end..]))
}

/// Identifier-led operand: reserved words, a plain identifier, a member
/// chain, or a call expression.
fn parse_identifier_token(input: &str, filter_expression: bool) -> Result<(Expr, &str), ParseError> {
    let (word, rest) = scan_identifier(input)?;

    match word {
        "true" => return Ok((Expr::Literal(Value::Boolean(true)), rest)),
        "false" => return Ok((Expr::Literal(Value::Boolean(false)), rest)),
        "null" => return Ok((Expr::Null, rest)),
        // operator words cannot start an operand
        "and" | "or" => {
            return Err(ParseError::syntax(format!(
                "Unexpected operator '{}' near: {}",
                word,
                ellipsize(input)
            )))
        }
        _ => {}
    }

    let rest_ws = skip_ws(rest);
    match rest_ws.chars().next() {
        Some('.') | Some('[') => parse_member_chain(Expr::Identifier(word.to_string()), rest_ws),
        Some('(') => {
            let (args, rest) = parse_arguments(&rest_ws[1..], ')')?;
            Ok((
                Expr::Call {
                    name: word.to_string(),
                    args,
                },
                rest,
            ))
        }
        Some(':') if filter_expression => parse_filter_argument(word, &rest_ws[1..]),
        _ => Ok((Expr::Identifier(word.to_string()), rest)),
    }
}

/// Postfix member accesses after an identifier: `.name` (non-computed) or
/// `[expr]` (computed), repeated arbitrarily. A `(` after the chain is
/// rejected: call syntax is only valid directly on a bare identifier.
fn parse_member_chain(mut node: Expr, mut input: &str) -> Result<(Expr, &str), ParseError> {
    loop {
        match input.chars().next() {
            Some('.') => {
                let (name, rest) = scan_identifier(&input[1..])?;
                node = Expr::member(node, Expr::Identifier(name.to_string()), false);
                input = rest;
            }
            Some('[') => {
                let (property, rest) = parse_expression(&input[1..], false)?;
                let rest = skip_ws(rest);
                match rest.chars().next() {
                    Some(']') => {
                        node = Expr::member(node, property, true);
                        input = &rest[1..];
                    }
                    Some(c) => {
                        return Err(ParseError::syntax(format!(
                            "Expected ']' but was '{}'",
                            c
                        )))
                    }
                    None => {
                        return Err(ParseError::syntax(
                            "Expected ']' before end of input",
                        ))
                    }
                }
            }
            _ => return Ok((node, input)),
        }

        input = skip_ws(input);
        match input.chars().next() {
            Some('(') => {
                return Err(ParseError::syntax(
                    "Call expression found on member expression. Only filters can be invoked.",
                ))
            }
            Some('.') | Some('[') => {}
            _ => return Ok((node, input)),
        }
    }
}

/// Whitespace-sensitive filter call: everything after the `:` up to the
/// next newline or `}}` close marker (whichever comes first) becomes a
/// single string argument with `{` and `}` doubled. The terminator is left
/// in the remainder.
fn parse_filter_argument<'a>(name: &str, input: &'a str) -> Result<(Expr, &'a str), ParseError> {
    let newline = input.find('\n');
    let close = input.find("}}");
    let end = match (newline, close) {
        (Some(n), Some(c)) => Some(n.min(c)),
        (Some(n), None) => Some(n),
        (None, Some(c)) => Some(c),
        (None, None) => None,
    };
    let end = match end {
        Some(i) => i,
        None => {
            return Err(ParseError::syntax(format!(
                "Whitespace sensitive syntax did not find a new line or '}}}}' to mark the end of the statement, near '{}'",
                ellipsize(input)
            )))
        }
    };

    let original = input[..end].trim();
    let rewritten = original.replace('{', "{{").replace('}', "}}");
    Ok((
        Expr::Call {
            name: name.to_string(),
            args: vec![Expr::Literal(Value::String(rewritten))],
        },
        &input[end..],
    ))
}

/// Parses a filter invocation: `name`, `name(args…)`, or — in filter mode —
/// the whitespace-sensitive `name: raw text…` form. A bare name is a
/// zero-argument call.
///
/// This is the entry point the surrounding template tokenizer uses for the
/// filter chain; [`parse_expression`] reaches the same forms when an
/// identifier is directly followed by `(` or (filter mode) `:`.
pub fn parse_call_expression(
    input: &str,
    filter_expression: bool,
) -> Result<(Expr, &str), ParseError> {
    let (word, rest) = scan_identifier(input)?;
    if matches!(word, "true" | "false" | "null" | "and" | "or") {
        return Err(ParseError::syntax(format!(
            "Expected identifier but instead found '{}'",
            word
        )));
    }

    let rest = skip_ws(rest);
    match rest.chars().next() {
        Some('(') => {
            let (args, rest) = parse_arguments(&rest[1..], ')')?;
            Ok((
                Expr::Call {
                    name: word.to_string(),
                    args,
                },
                rest,
            ))
        }
        Some(':') if filter_expression => parse_filter_argument(word, &rest[1..]),
        _ => Ok((
            Expr::Call {
                name: word.to_string(),
                args: Vec::new(),
            },
            rest,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipsize_caps_context() {
        let long: String = "x".repeat(80);
        let out = ellipsize(&long);
        assert_eq!(out.chars().count(), 53);
        assert!(out.ends_with("..."));
        assert_eq!(ellipsize("short"), "short");
    }

    #[test]
    fn peek_operator_longest_match() {
        assert!(matches!(peek_operator(">= 1"), Ok(Some((BinOp::GreaterEqual, _)))));
        assert!(matches!(peek_operator("!== x"), Ok(Some((BinOp::StrictNotEqual, _)))));
        assert!(matches!(peek_operator("&& y"), Ok(Some((BinOp::And, _)))));
        assert!(matches!(peek_operator("<< 2"), Ok(Some((BinOp::ShiftLeft, _)))));
        assert!(matches!(peek_operator("and b"), Ok(Some((BinOp::And, _)))));
        // not the operator word, an identifier
        assert!(matches!(peek_operator("android"), Ok(None)));
        // terminators stop the climb
        assert!(matches!(peek_operator(") + 1"), Ok(None)));
        assert!(matches!(peek_operator(""), Ok(None)));
    }

    #[test]
    fn scan_identifier_rejects_digit_start() {
        assert!(scan_identifier("9lives").is_err());
        let (word, rest) = scan_identifier("  _tmp1 rest").unwrap();
        assert_eq!(word, "_tmp1");
        assert_eq!(rest, " rest");
    }
}
