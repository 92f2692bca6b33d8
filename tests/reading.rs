use sff::{from_str, from_str_with_options, DataType, Error, ParseOptions, Parser};

#[rstest::rstest]
fn test_reads_a_typical_document() {
    let input = r#"
// window setup
width = 800
height = 600
title = "My \"quoted\" editor"
view = (
    x = 0, y = 0
    zoom = 1.5
    /* inline list */
    margins = {4, 4, 8, 8}
)
"#;
    let table = from_str(input).unwrap();
    assert_eq!(table.integer::<u32>("width").unwrap(), Some(800));
    assert_eq!(table.integer::<u32>("height").unwrap(), Some(600));
    assert_eq!(table.string("title"), Some("My \"quoted\" editor"));

    let view = table.table("view").unwrap();
    assert_eq!(view.integer::<f64>("zoom").unwrap(), Some(1.5));
    let margins = view.array("margins").unwrap();
    assert_eq!(margins.len(), 4);
    assert_eq!(margins.integer::<i32>(2).unwrap(), Some(8));
}

#[rstest::rstest]
fn test_keys_keep_declaration_order() {
    let table = from_str("zebra = 1, apple = 2, mango = 3").unwrap();
    let keys: Vec<&str> = table.keys().collect();
    assert_eq!(keys, vec!["zebra", "apple", "mango"]);
}

#[rstest::rstest]
fn test_comment_only_document_is_empty() {
    let table = from_str("// a\n/* b */ // c").unwrap();
    assert!(table.is_empty());
}

#[rstest::rstest]
fn test_sign_law_on_extraction() {
    let table = from_str("delta = -12").unwrap();
    assert_eq!(table.integer::<i32>("delta").unwrap(), Some(-12));
    assert!(matches!(
        table.integer::<u32>("delta").unwrap_err(),
        Error::NegativeIntoUnsigned { .. }
    ));
}

#[rstest::rstest]
fn test_fractional_literal_reads_both_ways() {
    let table = from_str("ratio = -2.75").unwrap();
    assert_eq!(table.integer::<f64>("ratio").unwrap(), Some(-2.75));
    assert_eq!(table.integer::<i32>("ratio").unwrap(), Some(-2));
}

#[rstest::rstest]
fn test_overflow_reports_the_literal() {
    let table = from_str("big = 99999999999999999999999999").unwrap();
    let err = table.integer::<i64>("big").unwrap_err();
    assert!(matches!(err, Error::IntegerOverflow { .. }));
    assert!(err.to_string().contains("99999999999999999999999999"));

    // wide enough to fit u128 without fitting any signed target
    let table = from_str("big = 340282366920938463463374607431768211455").unwrap();
    assert!(matches!(
        table.integer::<i64>("big").unwrap_err(),
        Error::IntegerOverflow { .. }
    ));
}

#[rstest::rstest]
#[case("key = ", "unexpected end of input")]
#[case("key 1", "'=' expected")]
#[case("key = }", "value expected")]
#[case("= 1", "identifier expected")]
fn test_syntax_errors(#[case] input: &str, #[case] message: &str) {
    let err = from_str(input).unwrap_err();
    assert!(
        err.to_string().contains(message),
        "{input:?} produced {err}"
    );
}

#[rstest::rstest]
fn test_errors_carry_line_numbers() {
    let err = from_str("a = 1\n\n\nb = {").unwrap_err();
    assert!(err.to_string().starts_with("line 4:"));
}

#[rstest::rstest]
fn test_double_dot_literal_is_a_syntax_error() {
    // "1.2.3" lexes as a decimal, a stray dot, and another decimal
    let err = from_str("v = 1.2.3").unwrap_err();
    assert!(matches!(err, Error::UnexpectedToken { .. }));
}

#[rstest::rstest]
fn test_unterminated_string_is_a_syntax_error() {
    assert!(from_str("s = \"open").is_err());
}

#[rstest::rstest]
fn test_depth_limit_is_configurable() {
    let options = ParseOptions::new().with_max_depth(4);
    assert!(from_str_with_options("a = (b = (c = 1))", options).is_ok());

    let deep = format!("a = {}1{}", "{".repeat(200), "}".repeat(200));
    assert!(matches!(from_str(&deep).unwrap_err(), Error::TooDeep { .. }));
}

#[rstest::rstest]
fn test_streaming_reads_with_the_parser() {
    let mut parser = Parser::new("mode = \"fast\" retries = 3");

    assert_eq!(parser.parse_assignment().unwrap(), "mode");
    assert_eq!(parser.detect_data_type().unwrap(), DataType::String);
    assert_eq!(parser.parse_string().unwrap(), "fast");

    assert_eq!(parser.parse_assignment().unwrap(), "retries");
    assert_eq!(parser.parse_integer::<u8>().unwrap(), 3);
}

#[rstest::rstest]
fn test_failed_attempts_do_not_consume_input() {
    let mut parser = Parser::new("name = \"x\"");
    parser.parse_assignment().unwrap();
    assert!(parser.try_parse_integer::<i64>().is_none());
    assert!(!parser.try_enter_table());
    assert_eq!(parser.parse_string().unwrap(), "x");
}

#[rstest::rstest]
fn test_typed_array_parsing() {
    let mut parser = Parser::new("{10 20 30}");
    let mut sum = 0u32;
    parser.parse_array::<u32>(|n| sum += n).unwrap();
    assert_eq!(sum, 60);
}

#[rstest::rstest]
fn test_skipping_unknown_values() {
    let mut parser = Parser::new("legacy = (huge = {1, 2, {3}}, s = \"x\") keep = 7");
    parser.parse_assignment().unwrap();
    parser.skip_value().unwrap();
    assert_eq!(parser.parse_assignment().unwrap(), "keep");
    assert_eq!(parser.parse_integer::<i32>().unwrap(), 7);
}

#[rstest::rstest]
fn test_mixed_array_with_trailing_comma_at_root() {
    let table = from_str("key = {1, 2, (a = 1)},").unwrap();
    assert_eq!(table.len(), 1);
    let array = table.array("key").unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.integer::<i32>(0).unwrap(), Some(1));
    assert_eq!(array.integer::<i32>(1).unwrap(), Some(2));
    let nested = array.table(2).unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested.integer::<i32>("a").unwrap(), Some(1));
}

#[rstest::rstest]
fn test_parse_value_builds_any_kind() {
    let mut parser = Parser::new("{1, 2, (a = 1)}");
    let value = sff::parse_value(&mut parser).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 3);
    assert!(array.get(2).unwrap().is_table());
}
