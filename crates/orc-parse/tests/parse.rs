use orc_errors::ERROR_CAPACITY;
use orc_parse::{Document, ExprKind, ParseContext, ParseErrorKind, parse};
use orc_tokenizer::{TokenKind, Tokenizer};

fn parse_str(context: &mut ParseContext, text: &str) -> Document {
    let mut tokenizer = Tokenizer::new("test.or", text);
    parse(context, &mut tokenizer)
}

/// Token texts of every node, in order.
fn node_texts(context: &ParseContext, document: &Document, text: &str) -> Vec<Vec<String>> {
    context
        .nodes(document)
        .map(|(_, node)| {
            node.tokens().map(|id| context.token(id).text(text).to_owned()).collect()
        })
        .collect()
}

fn error_kinds(context: &ParseContext) -> Vec<ParseErrorKind> {
    context.errors().iter().map(|error| error.kind()).collect()
}

#[test]
fn string_value() {
    let text = r#"var title="Hello";"#;
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors());
    assert_eq!(document.len, 1);

    let (_, node) = context.nodes(&document).next().unwrap();
    assert_eq!(node.kind, ExprKind::Var);
    assert_eq!(node.tokens_length(), 3);
    assert_eq!(node.next, None);
    assert_eq!(node.first_parameter, None);

    let assignment = node.assignment.unwrap();
    assert_eq!(context.token(assignment.name).kind, TokenKind::VAR_TAG);
    assert_eq!(context.token(assignment.op).kind, TokenKind::SYMBOL);
    let value = context.token(assignment.value);
    assert_eq!(value.kind, TokenKind::STRING_CONSTANT);
    assert_eq!(value.text(text), r#""Hello""#);
}

#[test]
fn integer_value() {
    let text = "var count = 42;";
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors());
    assert_eq!(node_texts(&context, &document, text), [["var count ", "=", "42"]]);
}

#[test]
fn integer_with_inner_space_is_rejected() {
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, "var NAME = 12 3;");

    assert!(document.is_empty());
    assert_eq!(error_kinds(&context), [ParseErrorKind::InvalidIntegerTerminator]);
    assert_eq!(
        context.errors()[0].message(context.arena()),
        "Expected Int value but had incorrect char  ."
    );
}

#[test]
fn missing_equals_is_malformed() {
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, "var NAME 123;");

    assert_eq!(document.len, 0);
    assert_eq!(document.head, None);
    assert_eq!(error_kinds(&context), [ParseErrorKind::MalformedTag]);
    assert_eq!(context.errors()[0].message(context.arena()), "Malformed tag.");
}

#[test]
fn colon_form_is_malformed() {
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, "var NAME : 1;");

    assert!(document.is_empty());
    assert_eq!(error_kinds(&context), [ParseErrorKind::MalformedTag]);
}

#[test]
fn empty_value_is_missing() {
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, "var NAME = ;");

    assert!(document.is_empty());
    assert_eq!(error_kinds(&context), [ParseErrorKind::MissingValue]);
    assert_eq!(context.errors()[0].message(context.arena()), "Expected value before endline");
    assert_eq!(context.errors()[0].line(), 1);
}

#[test]
fn directive_without_semicolon_ends_at_its_value() {
    let text = "var a = \"x\"\nvar b = 2;";
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors(), "{:?}", error_kinds(&context));
    assert_eq!(
        node_texts(&context, &document, text),
        [["var a ", "=", "\"x\""], ["var b ", "=", "2"]]
    );

    let text = r#"var a = "x" var b = "y";"#;
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors(), "{:?}", error_kinds(&context));
    assert_eq!(
        node_texts(&context, &document, text),
        [["var a ", "=", "\"x\""], ["var b ", "=", "\"y\""]]
    );
}

#[test]
fn first_value_is_kept() {
    let text = r#"var v = "s" 7;"#;
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors());
    assert_eq!(node_texts(&context, &document, text), [["var v ", "=", "\"s\""]]);

    let text = r#"var n = 1"s";"#;
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors());
    assert_eq!(node_texts(&context, &document, text), [["var n ", "=", "1"]]);
}

#[test]
fn semicolon_after_whitespace_closes_the_directive() {
    let text = "var s = \"x\" \t;\nvar t = \"y\";";
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors());
    assert_eq!(document.len, 2);
}

#[test]
fn unterminated_string_is_rejected() {
    for text in [r#"var s = "open"#, r#"var s = "esc\""#, "var s = \""] {
        let mut context = ParseContext::new();
        let document = parse_str(&mut context, text);

        assert!(document.is_empty(), "{text:?}");
        assert_eq!(error_kinds(&context), [ParseErrorKind::ExpectedString], "{text:?}");
        assert_eq!(
            context.errors()[0].message(context.arena()),
            "Expected \" to follow String assignation."
        );
    }

    let text = r#"var s = "esc\\";"#;
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);
    assert!(!context.has_errors());
    assert_eq!(node_texts(&context, &document, text), [["var s ", "=", r#""esc\\""#]]);
}

#[test]
fn tokens_and_nodes_get_distinct_handles() {
    let mut context = ParseContext::new();

    let first = context.allocate_token();
    let second = context.allocate_token();
    assert_ne!(first, second);
    assert!(context.token(first).is_none());

    context.token_mut(second).kind = TokenKind::INT;
    assert_eq!(context.token(second).kind, TokenKind::INT);
    assert_eq!(context.token(first).kind, TokenKind::NONE);

    let node = context.allocate_node();
    assert_eq!(context.node(node).kind, ExprKind::Invalid);
    assert_eq!(context.node(node).tokens_length(), 0);
    context.node_mut(node).kind = ExprKind::Var;
    assert_eq!(context.node(node).kind, ExprKind::Var);
}

#[test]
fn brackets_do_not_gate_the_value() {
    let text = "var v = [1];";
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors(), "{:?}", error_kinds(&context));
    assert_eq!(document.len, 1);
}

#[test]
fn parsing_is_idempotent_across_contexts() {
    let text = "var a = 1;\n\nvar b = \"two\";\n* | `\nvar c = 3;\n";

    let mut first = ParseContext::new();
    let first_doc = parse_str(&mut first, text);
    let mut second = ParseContext::new();
    let second_doc = parse_str(&mut second, text);

    assert_eq!(first_doc.len, 3);
    assert_eq!(first.debug_tree(&first_doc, text), second.debug_tree(&second_doc, text));
    assert_eq!(error_kinds(&first), error_kinds(&second));
}

#[test]
fn two_assignments_separated_by_blank_line() {
    let text = "var a=1;\n\nvar b=2;";
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors());
    assert_eq!(
        node_texts(&context, &document, text),
        [["var a", "=", "1"], ["var b", "=", "2"]]
    );

    let mut nodes = context.nodes(&document);
    let (first_id, first) = nodes.next().unwrap();
    let (second_id, second) = nodes.next().unwrap();
    assert!(nodes.next().is_none());
    assert_eq!(document.head, Some(first_id));
    assert_eq!(first.next, Some(second_id));
    assert_eq!(second.next, None);
}

#[test]
fn escaped_name_and_string_value() {
    let text = r#"var a\=b = "x;y";"#;
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert!(!context.has_errors());
    assert_eq!(node_texts(&context, &document, text), [[r"var a\=b ", "=", r#""x;y""#]]);
}

#[test]
fn no_nodes_after_the_first_error() {
    let text = "var a = 1;\n{\nvar b = 2;\n";
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, text);

    assert_eq!(document.len, 1);
    assert_eq!(error_kinds(&context), [ParseErrorKind::UnexpectedSymbol]);

    let error = &context.errors()[0];
    assert_eq!(error.line(), 2);
    assert_eq!(error.message(context.arena()), "Unexpected symbol '{'");
    assert_eq!(error.source_name(context.arena()), "test.or");
    assert_eq!(
        error.display(context.arena()).to_string(),
        "Parse Error (test.or:2): Unexpected symbol '{'"
    );
}

#[test]
fn collector_keeps_the_first_thirty_two() {
    let mut context = ParseContext::new();
    let tokenizer = Tokenizer::new("many.or", "");

    for i in 0..40 {
        context.push_error(&tokenizer, ParseErrorKind::MissingValue, format_args!("error {i}"));
    }

    assert_eq!(context.errors().len(), ERROR_CAPACITY);
    assert_eq!(context.error_collector().dropped(), 8);
    for (i, error) in context.errors().iter().enumerate() {
        assert_eq!(error.message(context.arena()), format!("error {i}"));
    }
}

#[test]
fn one_context_serves_several_sources() {
    let mut context = ParseContext::with_block_capacity(64);

    let a = "var a = 1;";
    let doc_a = parse_str(&mut context, a);
    let b = "var b = \"bee\";";
    let doc_b = parse_str(&mut context, b);

    assert!(!context.has_errors());
    assert_eq!(node_texts(&context, &doc_a, a), [["var a ", "=", "1"]]);
    assert_eq!(node_texts(&context, &doc_b, b), [["var b ", "=", "\"bee\""]]);
}

#[test]
fn empty_source_parses_to_nothing() {
    let mut context = ParseContext::new();
    let document = parse_str(&mut context, "");

    assert!(document.is_empty());
    assert!(!context.has_errors());
    assert_eq!(context.error_collector().capacity(), 0);
}

#[test]
fn context_hands_out_arena_memory() {
    let mut context = ParseContext::with_block_capacity(16);

    let region = context.allocate(8);
    assert_eq!(region.len(), 8);
    let name = context.copy_string("source.or");
    let short = context.copy_string_n("truncate me", 8);

    assert_eq!(context.str(name), "source.or");
    assert_eq!(context.str(short), "truncate");
    assert_eq!(context.arena().block_count(), 3);
    assert_eq!(context.arena().allocated_bytes(), 8 + 9 + 8);
}
