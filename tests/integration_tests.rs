// tests/integration_tests.rs

use arbor_query::tree::{MemoryNode, Node};
use arbor_query::{Locator, Value, ValueProvider, parse_filter, register_function};
use serde_json::json;

/// Stream order of the fixture:
///
/// ```text
/// /en
/// /en/testpage3
/// /en/testpage3/child
/// /en/testpage3/child/jcr:content
/// /en/testpage3/jcr:content
/// /en/testpage2
/// /en/testpage2/jcr:content
/// /en/testpage1
/// /en/testpage1/jcr:content
/// /en/jcr:content
/// ```
fn fixture() -> MemoryNode {
    MemoryNode::from_json(
        "en",
        &json!({
            "jcr:content": {
                "jcr:title": "English",
                "created": "2013-08-05T10:00:00.000+02:00",
                "layout": "home"
            },
            "testpage1": {
                "jcr:content": {
                    "jcr:title": "English",
                    "created": "2013-08-06T10:00:00.000+02:00",
                    "tags": ["news", "blog"]
                }
            },
            "testpage2": {
                "jcr:content": {
                    "jcr:title": "English",
                    "created": "2013-08-07T14:32:59Z",
                    "tags": ["news"],
                    "hidden": true
                }
            },
            "testpage3": {
                "jcr:content": {
                    "jcr:title": "Mongolian",
                    "created": "2013-08-09T09:00:00+02:00",
                    "rank": 12
                },
                "child": {
                    "jcr:content": {
                        "jcr:title": "English",
                        "created": "2013-08-10",
                        "rank": "7.50"
                    }
                }
            }
        }),
    )
}

fn handle(filter: &str) -> Vec<String> {
    Locator::start_from(fixture())
        .locate_expr(filter)
        .unwrap_or_else(|e| panic!("{} failed: {}", filter, e))
        .iter()
        .map(|n| n.path().to_string())
        .collect()
}

fn handle_stream(filter: &str) -> Vec<String> {
    let predicate = parse_filter(filter).unwrap();
    Locator::start_from(fixture())
        .stream()
        .filter(|n| predicate.test(n))
        .map(|n| n.path().to_string())
        .collect()
}

fn count(filter: &str) -> usize {
    handle(filter).len()
}

// ============================================================================
// Selectors
// ============================================================================

#[test]
fn test_name_function_is() {
    assert_eq!(handle("name() == 'testpage1'"), ["/en/testpage1"]);
}

#[test]
fn test_property_is() {
    assert_eq!(
        handle("[jcr:content/jcr:title] == 'English'"),
        ["/en", "/en/testpage3/child", "/en/testpage2", "/en/testpage1"]
    );
}

#[test]
fn test_bare_property_with_worded_operator() {
    assert_eq!(count("jcr:content/jcr:title is 'English'"), 4);
    assert_eq!(count("jcr:content/jcr:title is not 'English'"), 6);
}

#[test]
fn test_path_function() {
    assert_eq!(count("path() like '/en/testpage3.*'"), 4);
}

#[test]
fn test_stream_filter_agrees_with_locate() {
    for filter in [
        "[jcr:content/jcr:title] == 'English'",
        "name() like 'test.*' or [layout] != null",
        "[jcr:content/foo] == null",
    ] {
        assert_eq!(handle(filter), handle_stream(filter), "Failed for: {}", filter);
    }
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn test_date_before_value() {
    let query = "[jcr:content/created] < '2013-08-08T16:32:59.000+02:00'";
    assert_eq!(handle(query), ["/en", "/en/testpage2", "/en/testpage1"]);
}

#[test]
fn test_date_and_property() {
    assert_eq!(
        count(
            "[jcr:content/created] < '2013-08-08T16:32:59.000+02:00' \
             and [jcr:content/jcr:title] == 'English'"
        ),
        3
    );
}

#[test]
fn test_date_or_property() {
    assert_eq!(
        count(
            "[jcr:content/created] < '2013-08-08T16:32:59.000+02:00' \
             or [jcr:content/jcr:title] == 'Mongolian'"
        ),
        4
    );
}

#[test]
fn test_date_function_offset_text() {
    assert_eq!(
        count("[jcr:content/created] < date('2013-08-08T16:32:59.000+02:00')"),
        3
    );
}

#[test]
fn test_date_function_custom_format() {
    let format = "\"EEE MMM dd yyyy HH:mm:ss 'GMT'Z\"";
    let before = format!(
        "[jcr:content/created] < date('Thu Aug 07 2013 16:32:59 GMT+0200', {})",
        format
    );
    let up_to = before.replacen(" < ", " <= ", 1);
    assert_eq!(count(&before), 2);
    assert_eq!(count(&up_to), 3);
}

#[test]
fn test_date_function_strftime_format() {
    assert_eq!(
        count("[jcr:content/created] >= date('10.08.2013', '%d.%m.%Y')"),
        1
    );
}

#[test]
fn test_local_times_are_utc() {
    assert_eq!(count("[jcr:content/created] <= '2013-08-07T14:32'"), 2);
    assert_eq!(count("[jcr:content/created] <= '2013-08-07T14:32:59'"), 3);
}

#[test]
fn test_date_only_property() {
    // "2013-08-10" reads as midnight UTC
    assert_eq!(handle("[jcr:content/created] > '2013-08-09T23:59Z'"), ["/en/testpage3/child"]);
}

#[test]
fn test_date_now_is_after_everything() {
    assert_eq!(count("[jcr:content/created] < date()"), 5);
}

// ============================================================================
// Null handling
// ============================================================================

#[test]
fn test_null_property() {
    assert_eq!(count("[jcr:content/foo] == null"), 10);
}

#[test]
fn test_not_null_property() {
    assert_eq!(handle("[layout] != null"), ["/en/jcr:content"]);
}

#[test]
fn test_null_literal_on_left() {
    assert_eq!(count("null == [jcr:content/foo]"), 10);
}

// ============================================================================
// Multi-valued operators
// ============================================================================

#[test]
fn test_contains() {
    assert_eq!(
        handle("[jcr:content/tags] contains 'news'"),
        ["/en/testpage2", "/en/testpage1"]
    );
    assert_eq!(handle("[jcr:content/tags] contains 'news', 'blog'"), ["/en/testpage1"]);
    assert_eq!(count("[jcr:content/tags] contains not 'news'"), 8);
}

#[test]
fn test_contains_any() {
    assert_eq!(handle("[jcr:content/tags] contains any 'blog', 'x'"), ["/en/testpage1"]);
    assert_eq!(count("[jcr:content/tags] contains any 'x', 'y'"), 0);
    assert_eq!(count("[jcr:content/tags] contains not any 'blog', 'x'"), 9);
}

#[test]
fn test_in_is_a_subset_test() {
    assert_eq!(count("[jcr:content/tags] in 'news', 'blog', 'misc'"), 2);
    assert_eq!(handle("[jcr:content/tags] in 'news'"), ["/en/testpage2"]);
    assert_eq!(count("[jcr:content/jcr:title] in 'English', 'Mongolian'"), 5);
}

// ============================================================================
// Regular expressions
// ============================================================================

#[test]
fn test_like_is_whole_string() {
    assert_eq!(count("name() like 'testpage.*'"), 3);
    assert_eq!(count("name() like 'page'"), 0);
    assert_eq!(count("name() like '.*page\\d'"), 3);
    assert_eq!(count("name() not like 'testpage.*'"), 7);
}

#[test]
fn test_like_with_bad_pattern_never_matches() {
    assert_eq!(count("name() like '(unclosed'"), 0);
    assert_eq!(count("name() not like '(unclosed'"), 10);
}

// ============================================================================
// Numbers & booleans
// ============================================================================

#[test]
fn test_numeric_comparisons() {
    assert_eq!(handle("[jcr:content/rank] > 10"), ["/en/testpage3"]);
    assert_eq!(handle("[jcr:content/rank] < 10"), ["/en/testpage3/child"]);
    assert_eq!(handle("[jcr:content/rank] == 7.5"), ["/en/testpage3/child"]);
    assert_eq!(count("[jcr:content/rank] greater than 1e1"), 1);
    assert_eq!(count("[jcr:content/rank] less than 100"), 2);
}

#[test]
fn test_boolean_properties() {
    assert_eq!(handle("[jcr:content/hidden] == true"), ["/en/testpage2"]);
    assert_eq!(handle("[jcr:content/hidden] is 'true'"), ["/en/testpage2"]);
    assert_eq!(count("[jcr:content/hidden] != true"), 9);
}

// ============================================================================
// Lenient evaluation
// ============================================================================

#[test]
fn test_bad_dates_do_not_abort() {
    assert_eq!(count("[jcr:content/created] < date('garbage')"), 0);
    assert_eq!(count("[jcr:content/created] < date('2013-08-08', 'not a format')"), 0);
}

#[test]
fn test_type_mismatch_is_non_match() {
    assert_eq!(count("[jcr:content/jcr:title] > 5"), 0);
    assert_eq!(count("[jcr:content/jcr:title] <= 5 or name() == 'testpage2'"), 1);
}

#[test]
fn test_unknown_function_is_null() {
    assert_eq!(count("no_such_function() == null"), 10);
    assert_eq!(count("no_such_function([a]) == 'x'"), 0);
}

// ============================================================================
// Custom functions
// ============================================================================

#[test]
fn test_registered_function() {
    register_function("integration_lower", |args| {
        let arg = args.into_iter().next().unwrap_or_else(ValueProvider::null);
        ValueProvider::dynamic(move |node| {
            arg.resolve(node).map(|value| match value {
                Value::String(s) => Value::String(s.to_lowercase()),
                other => other,
            })
        })
    });

    assert_eq!(count("integration_lower([jcr:content/jcr:title]) == 'english'"), 4);
}

// ============================================================================
// Traversal control
// ============================================================================

#[test]
fn test_skip_content_nodes() {
    let pages: Vec<String> = Locator::start_from(fixture())
        .traversal_control_expr("name() != 'jcr:content'")
        .unwrap()
        .stream()
        .map(|n| n.path().to_string())
        .collect();
    assert_eq!(
        pages,
        [
            "/en",
            "/en/testpage3",
            "/en/testpage3/child",
            "/en/testpage2",
            "/en/testpage1"
        ]
    );
}

#[test]
fn test_paging_through_matches() {
    let locator = |start, n| Locator::start_from(fixture()).range(start, n).unwrap();
    let query = parse_filter("[jcr:content/jcr:title] == 'English'").unwrap();

    let first = locator(0, 2).locate(&query);
    let second = locator(2, 2).locate(&query);
    let third = locator(4, 2).locate(&query);

    let paths = |nodes: &[MemoryNode]| -> Vec<String> {
        nodes.iter().map(|n| n.path().to_string()).collect()
    };
    assert_eq!(paths(&first), ["/en", "/en/testpage3/child"]);
    assert_eq!(paths(&second), ["/en/testpage2", "/en/testpage1"]);
    assert!(third.is_empty());
}
