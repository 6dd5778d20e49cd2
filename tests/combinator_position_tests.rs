//! Integration tests for `aurora/selector-nested-combinator-position`

mod common;

use aurora_lint::rules::combinator_position;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn expected(combinator: &str) -> String {
    combinator_position::expected(combinator)
}

#[test]
fn test_default_combinators() {
    let engine = engine_with(COMBINATOR_POSITION, json!("as-prefix"), None);

    assert_accepts(&engine, ".foo > .bar {}");
    assert_accepts(&engine, ".foo { > .bar {} }");
    assert_accepts(&engine, ".foo { & > .bar {} }");

    assert_rejects(
        &engine,
        ".foo > { .bar {} }",
        ".foo { > .bar {} }",
        &expected(">"),
    );
    assert_rejects(
        &engine,
        ".foo { > { .bar {} } }",
        ".foo { > .bar {} }",
        &expected(">"),
    );
}

#[test]
fn test_sibling_combinators() {
    let engine = engine_with(COMBINATOR_POSITION, json!("as-prefix"), None);
    assert_rejects(
        &engine,
        ".foo ~ { .bar {} }",
        ".foo { ~ .bar {} }",
        &expected("~"),
    );
    assert_rejects(
        &engine,
        ".foo + { .a, .b {} }",
        ".foo { + .a, + .b {} }",
        &expected("+"),
    );
}

#[test]
fn test_nesting_reference_wrapper_is_hoisted() {
    let engine = engine_with(COMBINATOR_POSITION, json!("as-prefix"), None);
    assert_rejects(
        &engine,
        ".foo {\n  & > {\n    .bar { color: red }\n    .baz { color: blue }\n  }\n}",
        ".foo {\n    > .bar { color: red }\n    > .baz { color: blue }\n}",
        &expected(">"),
    );
}

#[test]
fn test_root_level_wrapper_is_hoisted() {
    let engine = engine_with(COMBINATOR_POSITION, json!("as-prefix"), None);
    let result = lint(&engine, "> { .bar {} }\n.baz {}", true);
    assert_eq!(result.output, " > .bar {}\n.baz {}");
}

#[test]
fn test_custom_combinators() {
    let engine = engine_with(
        COMBINATOR_POSITION,
        json!("as-prefix"),
        Some(json!({ "includes": ["::v-deep"] })),
    );

    assert_accepts(&engine, ".foo ::v-deep .bar {}");
    assert_rejects(
        &engine,
        ".foo ::v-deep { .bar {} }",
        ".foo { ::v-deep .bar {} }",
        &expected("::v-deep"),
    );
}

#[test]
fn test_first_configured_combinator_wins() {
    let engine = engine_with(
        COMBINATOR_POSITION,
        json!("as-prefix"),
        Some(json!({ "includes": ["=>"] })),
    );
    let result = lint(&engine, ".foo => { .bar {} }", false);
    assert_eq!(messages(&result), vec![expected(">")]);
}

#[test]
fn test_invalid_expectation_is_a_no_op() {
    let engine = engine_with(COMBINATOR_POSITION, json!("invalid option"), None);

    assert_accepts(&engine, ".foo > .bar {}");
    assert_accepts(&engine, ".foo { > .bar {} }");

    let result = lint(&engine, ".foo > { .bar {} }", true);
    assert_eq!(result.output, ".foo > { .bar {} }");
    assert!(result.violations.is_empty());
    assert_eq!(result.invalid_options.len(), 1);
}

#[test]
fn test_invalid_secondary_options() {
    let engine = engine_with(
        COMBINATOR_POSITION,
        json!("as-prefix"),
        Some(json!({ "includes": [42] })),
    );
    let result = lint(&engine, ".foo > { .bar {} }", false);
    assert!(result.violations.is_empty());
    assert_eq!(result.invalid_options.len(), 1);
}

#[test]
fn test_violation_position() {
    let engine = engine_with(COMBINATOR_POSITION, json!("as-prefix"), None);
    let result = lint(&engine, ".a {}\n\n.foo > {\n  .bar {}\n}", false);

    let violation = assert_some!(result.violations.first());
    let span = assert_some!(violation.span);
    assert_eq!((span.start.line, span.start.column), (3, 1));
    assert_eq!(violation.snippet, ">");
    assert_eq!(
        violation.to_string(),
        "3:1 Expected combinator \">\" to be in the nested form (aurora/selector-nested-combinator-position)"
    );
}
