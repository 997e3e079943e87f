//! Error reporting: positions, caret context and rule trails.

use cdcn::{format_collection, parse_source, Error, Rule, GRAMMAR, MAX_NESTING};

fn context_lines(err: &Error) -> Vec<String> {
    let context = match err {
        Error::Lexical { context, .. }
        | Error::Syntax { context, .. }
        | Error::UnknownContext { context, .. } => context,
        other => panic!("Expected a parse error, got {:?}", other),
    };
    context.lines().map(str::to_string).collect()
}

#[test]
fn test_unmatchable_input_is_lexical() {
    let err = parse_source("[bad](array)\n").unwrap_err();
    assert!(matches!(err, Error::Lexical { line: 1, col: 2, .. }));
    assert!(err.to_string().contains("no token matches \"b\""));

    let lines = context_lines(&err);
    assert_eq!(lines[0], "1 | [bad](array)");
    assert_eq!(lines[1], "  |  ^");
}

#[test]
fn test_syntax_error_shows_previous_line() {
    let err = parse_source("[\n    1\n    2,\n](Array)\n").unwrap_err();
    assert_eq!((err.line(), err.column()), (Some(3), Some(6)));
    assert!(err
        .to_string()
        .contains("unexpected Delimiter \",\", expected EndOfLine"));

    let lines = context_lines(&err);
    assert_eq!(lines[0], "2 |     1");
    assert_eq!(lines[1], "3 |     2,");
    assert_eq!(lines[2], "  |      ^");
}

#[test]
fn test_gutter_widens_with_line_numbers() {
    let mut source = String::from("[\n");
    for _ in 0..8 {
        source.push_str("    1\n");
    }
    source.push_str("    2,\n](Array)\n");

    let err = parse_source(&source).unwrap_err();
    let lines = context_lines(&err);
    assert_eq!(lines[0], " 9 |     1");
    assert_eq!(lines[1], "10 |     2,");
    assert_eq!(lines[2], "   |      ^");
}

#[test]
fn test_rule_trail_innermost_first() {
    let err = parse_source("[1: 2, [3](Array): 4](Map)\n").unwrap_err();
    assert_eq!(err.column(), Some(8));
    assert!(err.to_string().contains("expected primitive"));

    let lines = context_lines(&err);
    let trail: Vec<&str> = lines
        .iter()
        .skip_while(|l| l.as_str() != "while parsing:")
        .skip(1)
        .map(|l| l.trim_start())
        .collect();

    let expected = [
        Rule::Key,
        Rule::Association,
        Rule::Associations,
        Rule::Collection,
        Rule::Source,
    ];
    assert_eq!(trail.len(), expected.len());
    for (line, rule) in trail.iter().zip(expected) {
        assert!(line.starts_with(rule.name()), "{} vs {}", line, rule.name());
        assert!(line.ends_with(rule.production()), "{} vs {}", line, rule);
    }
}

#[test]
fn test_trail_cites_grammar_productions() {
    let err = parse_source("[1, :](List)\n").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("while parsing:"));
    assert!(text.contains(&format!("{:<12} = {}", "value", Rule::Value.production())));

    for (_, name, production) in GRAMMAR {
        if text.contains(&format!("    {:<12} = ", name)) {
            assert!(text.contains(production));
        }
    }
}

#[test]
fn test_unknown_context() {
    let err = parse_source("[1, 2](Map)\n").unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("Unknown context \"Map\" for values at line 1, column 8"));
    assert_eq!(context_lines(&err)[1], "  |        ^");
}

#[test]
fn test_unexpected_end_of_file() {
    let err = parse_source("[1, 2\n").unwrap_err();
    assert_eq!((err.line(), err.column()), (Some(1), Some(6)));
    assert!(err.to_string().contains("unexpected EndOfFile"));
}

#[test]
fn test_missing_trailing_newline() {
    let err = parse_source("[1](Array)").unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
    assert!(err.to_string().contains("unexpected end of input"));
}

#[test]
fn test_extra_trailing_newline() {
    assert!(parse_source("[1](Array)\n\n").is_err());
}

#[test]
fn test_missing_context_tag() {
    for source in ["[1]\n", "[1]()\n", "[1](Array\n", "[1](Vector)\n"] {
        assert!(parse_source(source).is_err(), "{:?} parsed", source);
    }
}

#[test]
fn test_unclosed_quote_is_lexical() {
    let err = parse_source("[\"open](Array)\n").unwrap_err();
    assert!(matches!(err, Error::Lexical { col: 2, .. }));
}

#[test]
fn test_multi_line_requires_one_element_per_line() {
    let err = parse_source("[\n](Array)\n").unwrap_err();
    assert_eq!((err.line(), err.column()), (Some(2), Some(1)));
}

#[test]
fn test_unsupported_values() {
    struct Socket;

    impl cdcn::Notate for Socket {
        fn shape(&self) -> cdcn::Shape<'_> {
            cdcn::Shape::Opaque("Socket")
        }
    }

    let err = format_collection(&vec![Socket]).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
    assert_eq!(err.line(), None);
}

#[test]
fn test_crlf_context_has_no_carriage_returns() {
    let err = parse_source("[\r\n    1\r\n    2,\r\n](Array)\r\n").unwrap_err();
    assert_eq!((err.line(), err.column()), (Some(3), Some(6)));

    let lines = context_lines(&err);
    assert_eq!(lines[0], "2 |     1");
    assert_eq!(lines[1], "3 |     2,");
    assert_eq!(lines[2], "  |      ^");
    assert!(!err.to_string().contains('\r'));
}

#[test]
fn test_deep_nesting_is_an_error() {
    let depth = 10_000;
    let source = format!("{}1{}\n", "[".repeat(depth), "](Array)".repeat(depth));

    let err = parse_source(&source).unwrap_err();
    assert!(matches!(err, Error::Syntax { line: 1, .. }));
    assert_eq!(err.column(), Some(MAX_NESTING + 1));
    assert!(err.to_string().contains("nested deeper than"));
    assert_eq!(context_lines(&err)[1], format!("  | {}^", " ".repeat(MAX_NESTING)));
}
