// tests/render_tests.rs
//
// Canonical source rendering: parse, render with to_raw_string, and check
// that the rendered text parses back to the same tree.

use stencil_expr::ast::Expr;
use stencil_expr::parse_expression;

fn parse(input: &str) -> Expr {
    let (expr, rest) = parse_expression(input, false).expect("parse failed");
    assert_eq!(rest.trim(), "", "unconsumed input: {:?}", rest);
    expr
}

fn assert_renders(input: &str, rendered: &str) {
    assert_eq!(parse(input).to_raw_string(), rendered);
}

fn assert_round_trips(input: &str) {
    let expr = parse(input);
    let rendered = expr.to_raw_string();
    let reparsed = parse(&rendered);
    assert_eq!(expr, reparsed, "render changed the tree: {:?}", rendered);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_renders_binary_with_spaces() {
    assert_renders("1+2*3", "1 + 2 * 3");
    assert_renders("a and b", "a && b");
    assert_renders("a or b", "a || b");
}

#[test]
fn test_renders_strings_json_escaped() {
    assert_renders("'hello'", r#""hello""#);
    assert_renders(r"'a\'b'", r#""a'b""#);
    assert_renders("'say \"hi\"'", r#""say \"hi\"""#);
}

#[test]
fn test_renders_float_with_decimal_point() {
    // whole floats keep a fraction digit so they re-parse as floats
    assert_renders("1e3", "1000.0");
    assert_renders("2.5", "2.5");
    assert_renders("10", "10");
}

#[test]
fn test_renders_collections_compactly() {
    assert_renders("[3, 1, 2]", "[3,1,2]");
    assert_renders("{a: 1, b: 'x'}", r#"{a:1,b:"x"}"#);
    assert_renders("{x}", "{x}");
}

#[test]
fn test_renders_members_and_calls() {
    assert_renders("a.b.c", "a.b.c");
    assert_renders("items[ i + 1 ]", "items[i + 1]");
    assert_renders("max( a,2 )", "max(a,2)");
}

#[test]
fn test_renders_unary() {
    assert_renders("-x", "-x");
    assert_renders("!done", "!done");
    assert_renders("- 4", "-4");
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_round_trip_expressions() {
    assert_round_trips("1 + 2 * 3");
    assert_round_trips("a > 1 && b < 2 || !c");
    assert_round_trips("items[i + 1].name");
    assert_round_trips("{a: 1, b: [true, null, 'x'], c}");
    assert_round_trips("upper(trim(name))");
    assert_round_trips("-2.5 + +n");
    assert_round_trips("1 << 4 | 6 & 3");
}

#[test]
fn test_round_trip_preserves_numeric_kind() {
    // 1000.0 must stay a float through the round trip
    use stencil_expr::Value;
    let expr = parse("1e3");
    let reparsed = parse(&expr.to_raw_string());
    assert!(matches!(reparsed, Expr::Literal(Value::Float(f)) if f == 1000.0));
}

#[test]
fn test_round_trip_filter_call() {
    let (expr, _) = parse_expression("raw: some {text}\n", true).unwrap();
    // the rendered form is a structured call; braces stay doubled
    assert_eq!(expr.to_raw_string(), r#"raw("some {{text}}")"#);
}
