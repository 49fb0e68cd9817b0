// tests/parser_tests.rs

use stencil_expr::ast::{BinOp, Expr, UnaryOp};
use stencil_expr::value::Value;
use stencil_expr::{parse_call_expression, parse_expression};

fn parse(input: &str) -> Expr {
    let (expr, rest) = parse_expression(input, false).expect("parse failed");
    assert_eq!(rest.trim(), "", "unconsumed input: {:?}", rest);
    expr
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_integer_literal() {
    assert!(matches!(parse("42"), Expr::Literal(Value::Integer(42))));
    assert!(matches!(parse("0"), Expr::Literal(Value::Integer(0))));
}

#[test]
fn test_float_literals() {
    assert!(matches!(parse("3.14"), Expr::Literal(Value::Float(f)) if f == 3.14));
    // exponent form is a float even without a decimal point
    assert!(matches!(parse("1e3"), Expr::Literal(Value::Float(f)) if f == 1000.0));
    assert!(matches!(parse("2E-2"), Expr::Literal(Value::Float(f)) if f == 0.02));
    // no decimal point, no exponent: integer
    assert!(matches!(parse("10"), Expr::Literal(Value::Integer(10))));
}

#[test]
fn test_integer_literal_out_of_range() {
    assert!(parse_expression("99999999999999999999", false).is_err());
}

#[test]
fn test_string_literals() {
    assert!(matches!(
        parse("'hello'"),
        Expr::Literal(Value::String(s)) if s == "hello"
    ));
    assert!(matches!(
        parse("\"double\""),
        Expr::Literal(Value::String(s)) if s == "double"
    ));
    assert!(matches!(
        parse("`tick`"),
        Expr::Literal(Value::String(s)) if s == "tick"
    ));
}

#[test]
fn test_string_escaped_quote() {
    // the backslash escapes the delimiter and is dropped
    assert!(matches!(
        parse(r"'a\'b'"),
        Expr::Literal(Value::String(s)) if s == "a'b"
    ));
    // a backslash before any other character passes through verbatim
    assert!(matches!(
        parse(r"'a\nb'"),
        Expr::Literal(Value::String(s)) if s == r"a\nb"
    ));
}

#[test]
fn test_unterminated_string() {
    let err = parse_expression("'never closed", false).unwrap_err();
    assert!(err.message().contains("Unterminated string"));
}

#[test]
fn test_reserved_words() {
    assert!(matches!(parse("true"), Expr::Literal(Value::Boolean(true))));
    assert!(matches!(parse("false"), Expr::Literal(Value::Boolean(false))));
    assert!(matches!(parse("null"), Expr::Null));
}

// ============================================================================
// Precedence and grouping
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    // Should be: Add(1, Multiply(2, 3))
    match parse("1 + 2 * 3") {
        Expr::Binary {
            op: BinOp::Add,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Literal(Value::Integer(1))));
            assert!(matches!(
                *right,
                Expr::Binary {
                    op: BinOp::Multiply,
                    ..
                }
            ));
        }
        other => panic!("Expected addition, got {:?}", other),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    // Should be: Multiply(Add(1, 2), 3)
    match parse("(1 + 2) * 3") {
        Expr::Binary {
            op: BinOp::Multiply,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Binary { op: BinOp::Add, .. }));
            assert!(matches!(*right, Expr::Literal(Value::Integer(3))));
        }
        other => panic!("Expected multiplication, got {:?}", other),
    }
}

#[test]
fn test_equal_precedence_is_left_associative() {
    // Should be: Subtract(Subtract(10, 3), 2)
    match parse("10 - 3 - 2") {
        Expr::Binary {
            op: BinOp::Subtract,
            left,
            ..
        } => {
            assert!(matches!(
                *left,
                Expr::Binary {
                    op: BinOp::Subtract,
                    ..
                }
            ));
        }
        other => panic!("Expected subtraction, got {:?}", other),
    }
}

#[test]
fn test_logical_and_comparison_layering() {
    // Should be: And(GreaterThan(a, 1), LessThan(b, 2))
    match parse("a > 1 && b < 2") {
        Expr::Binary {
            op: BinOp::And,
            left,
            right,
        } => {
            assert!(matches!(
                *left,
                Expr::Binary {
                    op: BinOp::GreaterThan,
                    ..
                }
            ));
            assert!(matches!(
                *right,
                Expr::Binary {
                    op: BinOp::LessThan,
                    ..
                }
            ));
        }
        other => panic!("Expected logical and, got {:?}", other),
    }
}

#[test]
fn test_word_operators() {
    assert!(matches!(
        parse("a and b"),
        Expr::Binary { op: BinOp::And, .. }
    ));
    assert!(matches!(
        parse("a or b"),
        Expr::Binary { op: BinOp::Or, .. }
    ));
    // an identifier that merely starts with a word operator is not one
    assert!(matches!(parse("android"), Expr::Identifier(name) if name == "android"));
}

#[test]
fn test_word_operator_cannot_lead() {
    assert!(parse_expression("and b", false).is_err());
    assert!(parse_expression("or", false).is_err());
}

#[test]
fn test_strict_equality_tokens() {
    assert!(matches!(
        parse("a === b"),
        Expr::Binary {
            op: BinOp::StrictEqual,
            ..
        }
    ));
    assert!(matches!(
        parse("a !== b"),
        Expr::Binary {
            op: BinOp::StrictNotEqual,
            ..
        }
    ));
    assert!(matches!(
        parse("a >= b"),
        Expr::Binary {
            op: BinOp::GreaterEqual,
            ..
        }
    ));
}

#[test]
fn test_shift_and_bitwise_tokens() {
    assert!(matches!(
        parse("1 << 4"),
        Expr::Binary {
            op: BinOp::ShiftLeft,
            ..
        }
    ));
    // bitwise or sits below xor and and
    match parse("a | b ^ c & d") {
        Expr::Binary {
            op: BinOp::BitOr,
            right,
            ..
        } => {
            assert!(matches!(
                *right,
                Expr::Binary {
                    op: BinOp::BitXor,
                    ..
                }
            ));
        }
        other => panic!("Expected bitwise or at the top, got {:?}", other),
    }
}

#[test]
fn test_assignment_stops_the_climb() {
    // '=' has precedence 0, so the expression ends before it
    let (expr, rest) = parse_expression("a = b", false).unwrap();
    assert!(matches!(expr, Expr::Identifier(name) if name == "a"));
    assert!(rest.trim_start().starts_with('='));
}

#[test]
fn test_terminators_end_the_expression() {
    let (expr, rest) = parse_expression("1 + 2}}", false).unwrap();
    assert!(matches!(expr, Expr::Binary { op: BinOp::Add, .. }));
    assert_eq!(rest, "}}");

    let (_, rest) = parse_expression("x; y", false).unwrap();
    assert!(rest.starts_with(';'));
}

// ============================================================================
// Unary operators
// ============================================================================

#[test]
fn test_unary_minus() {
    match parse("-4") {
        Expr::Unary {
            op: UnaryOp::Minus,
            operand,
        } => {
            assert!(matches!(*operand, Expr::Literal(Value::Integer(4))));
        }
        other => panic!("Expected unary minus, got {:?}", other),
    }
}

#[test]
fn test_unary_not_and_plus() {
    assert!(matches!(
        parse("!done"),
        Expr::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
    assert!(matches!(
        parse("+n"),
        Expr::Unary {
            op: UnaryOp::Plus,
            ..
        }
    ));
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    // Should be: Add(Minus(1), 2)
    match parse("-1 + 2") {
        Expr::Binary {
            op: BinOp::Add,
            left,
            ..
        } => {
            assert!(matches!(
                *left,
                Expr::Unary {
                    op: UnaryOp::Minus,
                    ..
                }
            ));
        }
        other => panic!("Expected addition, got {:?}", other),
    }
}

// ============================================================================
// Arrays and objects
// ============================================================================

#[test]
fn test_array_literal_preserves_order() {
    match parse("[3, 1, 2]") {
        Expr::Array(elements) => {
            assert_eq!(elements.len(), 3);
            assert!(matches!(elements[0], Expr::Literal(Value::Integer(3))));
            assert!(matches!(elements[1], Expr::Literal(Value::Integer(1))));
            assert!(matches!(elements[2], Expr::Literal(Value::Integer(2))));
        }
        other => panic!("Expected array, got {:?}", other),
    }
}

#[test]
fn test_empty_array_and_object() {
    assert!(matches!(parse("[]"), Expr::Array(elements) if elements.is_empty()));
    assert!(matches!(parse("{}"), Expr::Object(props) if props.is_empty()));
}

#[test]
fn test_object_literal() {
    match parse("{a: 1, 'b': 2}") {
        Expr::Object(props) => {
            assert_eq!(props.len(), 2);
            assert!(matches!(props[0].key, Expr::Identifier(ref name) if name == "a"));
            assert!(!props[0].shorthand);
            assert!(matches!(props[1].key, Expr::Literal(Value::String(ref s)) if s == "b"));
        }
        other => panic!("Expected object, got {:?}", other),
    }
}

#[test]
fn test_object_shorthand_property() {
    match parse("{x}") {
        Expr::Object(props) => {
            assert_eq!(props.len(), 1);
            assert!(props[0].shorthand);
            assert!(matches!(props[0].key, Expr::Identifier(ref name) if name == "x"));
            assert!(matches!(props[0].value, Expr::Identifier(ref name) if name == "x"));
        }
        other => panic!("Expected object, got {:?}", other),
    }
}

#[test]
fn test_object_trailing_comma() {
    assert!(matches!(parse("{a: 1,}"), Expr::Object(props) if props.len() == 1));
    assert!(matches!(parse("[1, 2,]"), Expr::Array(elements) if elements.len() == 2));
}

#[test]
fn test_unterminated_object() {
    assert!(parse_expression("{a: 1", false).is_err());
    assert!(parse_expression("{a: 1,", false).is_err());
    assert!(parse_expression("{", false).is_err());
}

#[test]
fn test_invalid_object_key() {
    let err = parse_expression("{[1]: 2}", false).unwrap_err();
    assert!(err.message().contains("object key"));
}

#[test]
fn test_unterminated_arguments() {
    assert!(parse_expression("[1, 2", false).is_err());
    assert!(parse_expression("f(1,", false).is_err());
}

// ============================================================================
// Members and calls
// ============================================================================

#[test]
fn test_dotted_member_access() {
    match parse("a.b.c") {
        Expr::Member {
            object,
            property,
            computed,
        } => {
            assert!(!computed);
            assert!(matches!(*property, Expr::Identifier(ref name) if name == "c"));
            assert!(matches!(*object, Expr::Member { computed: false, .. }));
        }
        other => panic!("Expected member access, got {:?}", other),
    }
}

#[test]
fn test_computed_member_access() {
    match parse("items[i + 1]") {
        Expr::Member {
            property, computed, ..
        } => {
            assert!(computed);
            assert!(matches!(*property, Expr::Binary { op: BinOp::Add, .. }));
        }
        other => panic!("Expected member access, got {:?}", other),
    }
}

#[test]
fn test_call_expression() {
    match parse("max(a, 2)") {
        Expr::Call { name, args } => {
            assert_eq!(name, "max");
            assert_eq!(args.len(), 2);
        }
        other => panic!("Expected call, got {:?}", other),
    }
}

#[test]
fn test_call_on_member_is_rejected() {
    let err = parse_expression("a.b()", false).unwrap_err();
    assert!(err.message().contains("member expression"));
    assert!(parse_expression("a[0]()", false).is_err());
}

#[test]
fn test_parse_call_expression_bare_name() {
    let (expr, rest) = parse_call_expression("now", false).unwrap();
    match expr {
        Expr::Call { name, args } => {
            assert_eq!(name, "now");
            assert!(args.is_empty());
        }
        other => panic!("Expected call, got {:?}", other),
    }
    assert_eq!(rest, "");
}

#[test]
fn test_parse_call_expression_rejects_reserved() {
    assert!(parse_call_expression("true", false).is_err());
    assert!(parse_call_expression("null()", false).is_err());
}

// ============================================================================
// Filter mode
// ============================================================================

#[test]
fn test_filter_argument_to_newline() {
    let (expr, rest) = parse_expression("raw: some {text}\nrest", true).unwrap();
    match expr {
        Expr::Call { name, args } => {
            assert_eq!(name, "raw");
            assert_eq!(args.len(), 1);
            // braces are doubled so the argument re-embeds safely
            assert!(matches!(
                args[0],
                Expr::Literal(Value::String(ref s)) if s == "some {{text}}"
            ));
        }
        other => panic!("Expected call, got {:?}", other),
    }
    // the newline terminator is left for the caller
    assert_eq!(rest, "\nrest");
}

#[test]
fn test_filter_argument_to_close_marker() {
    let (expr, rest) = parse_expression("echo: a + b }}", true).unwrap();
    assert!(matches!(expr, Expr::Call { ref name, .. } if name == "echo"));
    assert_eq!(rest, "}}");
    if let Expr::Call { args, .. } = expr {
        assert!(matches!(
            args[0],
            Expr::Literal(Value::String(ref s)) if s == "a + b"
        ));
    }
}

#[test]
fn test_filter_argument_requires_terminator() {
    let err = parse_expression("raw: never ends", true).unwrap_err();
    assert!(err.message().contains("Whitespace sensitive"));
}

#[test]
fn test_filter_mode_off_treats_colon_as_end() {
    // without filter mode the identifier stands alone
    let (expr, rest) = parse_expression("raw: text\n", false).unwrap();
    assert!(matches!(expr, Expr::Identifier(name) if name == "raw"));
    assert!(rest.trim_start().starts_with(':'));
}

#[test]
fn test_filter_mode_does_not_leak_into_subexpressions() {
    // the ':' inside the object is a key separator, not a filter call
    let (expr, _) = parse_expression("{raw: 1}", true).unwrap();
    assert!(matches!(expr, Expr::Object(_)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_input() {
    assert!(parse_expression("", false).is_err());
    assert!(parse_expression("   ", false).is_err());
}

#[test]
fn test_operator_in_operand_position() {
    assert!(parse_expression("* 2", false).is_err());
    assert!(parse_expression("1 + * 2", false).is_err());
}

#[test]
fn test_unclosed_group() {
    assert!(parse_expression("(1 + 2", false).is_err());
    assert!(parse_expression("(1 + 2]", false).is_err());
}

#[test]
fn test_identifier_cannot_start_with_digit() {
    // "9lives" parses the number 9, leaving "lives" unconsumed
    let (expr, rest) = parse_expression("9lives", false).unwrap();
    assert!(matches!(expr, Expr::Literal(Value::Integer(9))));
    assert_eq!(rest, "lives");
}
