//! Property-based tests for the splitting primitives using QuickCheck.

use quickcheck::{QuickCheck, TestResult};
use sift_filter::lexer::{join_csv, split_csv, split_outside_brackets, unquote};

/// Property: on input without quotes or brackets, splitting outside
/// brackets degenerates to a plain comma split (modulo the lenient
/// trailing flush, which drops one trailing empty token).
#[test]
fn prop_plain_input_splits_like_plain_commas() {
    fn prop(s: String) -> TestResult {
        if s.chars().any(|c| matches!(c, '"' | '(' | ')')) {
            return TestResult::discard();
        }

        let mut expected: Vec<String> = s.split(',').map(str::to_string).collect();
        if expected.last().is_some_and(String::is_empty) {
            expected.pop();
        }
        TestResult::from_bool(split_outside_brackets(&s) == expected)
    }

    QuickCheck::new().quickcheck(prop as fn(String) -> TestResult);
}

/// Property: join then split round-trips for non-empty values without
/// embedded quotes, including values containing commas.
#[test]
fn prop_join_split_round_trip() {
    fn prop(values: Vec<String>) -> TestResult {
        if values
            .iter()
            .any(|v| v.is_empty() || v.contains('"') || v.contains('(') || v.contains(')'))
        {
            return TestResult::discard();
        }

        TestResult::from_bool(split_csv(&join_csv(&values)) == values)
    }

    QuickCheck::new().quickcheck(prop as fn(Vec<String>) -> TestResult);
}

/// Property: unquote never strips twice. Once a wrapped string has been
/// unwrapped, a second pass reports it unchanged.
#[test]
fn prop_unquote_is_idempotent() {
    fn prop(s: String) -> bool {
        let wrapped = format!("({s})");
        let (inner, was_wrapped) = unquote(&wrapped, '(', ')');
        if !was_wrapped || inner != s {
            return false;
        }
        // A second unquote may legitimately strip again only if the inner
        // string is itself wrapped; it must never report the original pair.
        let (twice, stripped) = unquote(inner, '(', ')');
        if stripped {
            inner.starts_with('(') && inner.ends_with(')')
        } else {
            twice == inner
        }
    }

    QuickCheck::new().quickcheck(prop as fn(String) -> bool);
}

/// Property: splitting outside brackets on balanced input never splits a
/// bracketed group apart; every returned token has balanced parentheses.
#[test]
fn prop_balanced_tokens_stay_balanced() {
    fn prop(groups: Vec<String>) -> TestResult {
        // Build an input of comma-joined balanced groups from arbitrary
        // bracket-free, quote-free fragments.
        if groups.is_empty()
            || groups
                .iter()
                .any(|g| g.is_empty() || g.chars().any(|c| matches!(c, '"' | '(' | ')')))
        {
            return TestResult::discard();
        }

        let input = groups
            .iter()
            .map(|g| format!("({g})"))
            .collect::<Vec<_>>()
            .join(",");

        let tokens = split_outside_brackets(&input);
        if tokens.len() != groups.len() {
            return TestResult::failed();
        }
        let balanced = tokens.iter().all(|t| {
            let opens = t.chars().filter(|&c| c == '(').count();
            let closes = t.chars().filter(|&c| c == ')').count();
            opens == closes
        });
        TestResult::from_bool(balanced)
    }

    QuickCheck::new().quickcheck(prop as fn(Vec<String>) -> TestResult);
}
