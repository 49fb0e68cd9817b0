//! Character classification tables for the expression tokenizer.
//!
//! The tables are fixed-size boolean arrays over the ASCII range, built at
//! compile time and shared by every parse call. Characters outside the ASCII
//! range never classify as numeric, identifier, or operator characters.

const TABLE_SIZE: usize = 128;

const fn numeric_chars() -> [bool; TABLE_SIZE] {
    let mut t = [false; TABLE_SIZE];
    let mut c = b'0';
    while c <= b'9' {
        t[c as usize] = true;
        c += 1;
    }
    t[b'.' as usize] = true;
    t
}

const fn ident_chars() -> [bool; TABLE_SIZE] {
    let mut t = [false; TABLE_SIZE];
    let mut c = b'a';
    while c <= b'z' {
        t[c as usize] = true;
        t[(c - b'a' + b'A') as usize] = true;
        c += 1;
    }
    let mut d = b'0';
    while d <= b'9' {
        t[d as usize] = true;
        d += 1;
    }
    t[b'_' as usize] = true;
    t
}

const fn operator_chars() -> [bool; TABLE_SIZE] {
    let mut t = [false; TABLE_SIZE];
    let ops = [
        b'<', b'>', b'=', b'!', b'+', b'-', b'*', b'/', b'%', b'|', b'&', b'^',
    ];
    let mut i = 0;
    while i < ops.len() {
        t[ops[i] as usize] = true;
        i += 1;
    }
    t
}

static NUMERIC_CHARS: [bool; TABLE_SIZE] = numeric_chars();
static IDENT_CHARS: [bool; TABLE_SIZE] = ident_chars();
static OPERATOR_CHARS: [bool; TABLE_SIZE] = operator_chars();

/// Digits and `.` — the characters that may continue a numeric literal.
pub fn is_numeric_char(c: char) -> bool {
    (c as usize) < TABLE_SIZE && NUMERIC_CHARS[c as usize]
}

/// Letters, digits, and `_` — valid anywhere after the first identifier char.
pub fn is_ident_char(c: char) -> bool {
    (c as usize) < TABLE_SIZE && IDENT_CHARS[c as usize]
}

/// Letters and `_` only; identifiers may not start with a digit.
pub fn is_ident_start(c: char) -> bool {
    is_ident_char(c) && !c.is_ascii_digit()
}

pub fn is_operator_char(c: char) -> bool {
    (c as usize) < TABLE_SIZE && OPERATOR_CHARS[c as usize]
}

/// Characters that end the enclosing expression (implicit precedence 0).
pub fn is_terminator(c: char) -> bool {
    matches!(c, ')' | '}' | ';' | ',' | ']')
}
