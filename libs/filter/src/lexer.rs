//! Quote-aware and bracket-aware string splitting.
//!
//! These primitives underpin every layer of the decoder: list values reuse
//! commas inside double-quoted spans, and conjunction bodies reuse commas
//! inside nested `(...)` groups. Both scanners are lenient about unmatched
//! trailing quotes: the remainder is flushed as one token, never an error.

/// Strips a single matching pair of delimiter characters.
///
/// Returns the inner slice and `true` only if the first character is `left`,
/// the last character is `right` and the string is at least two characters
/// long; otherwise the input is returned unchanged with `false`. Never
/// partially strips.
pub fn unquote(s: &str, left: char, right: char) -> (&str, bool) {
    let mut chars = s.chars();
    let (first, last) = match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => (first, last),
        // Zero or one character: nothing to strip.
        _ => return (s, false),
    };

    if first == left && last == right {
        (&s[first.len_utf8()..s.len() - last.len_utf8()], true)
    } else {
        (s, false)
    }
}

/// Splits on the first occurrence of `sep` only. When `sep` is absent the
/// second half is empty.
pub fn split_first(s: &str, sep: char) -> (&str, &str) {
    match s.split_once(sep) {
        Some((before, after)) => (before, after),
        None => (s, ""),
    }
}

/// Splits a comma-separated list, keeping commas inside double-quoted spans.
///
/// The surrounding quotes are stripped from quoted tokens, so
/// `a,"b,c"` yields `["a", "b,c"]`. A quote character simply toggles the
/// in-quotes state; this is not a full CSV grammar.
pub fn split_csv(s: &str) -> Vec<String> {
    split_on_top_level_commas(s, false)
}

/// Splits on top-level commas only: commas nested inside `(...)` groups or
/// inside double-quoted spans are preserved verbatim in their token.
///
/// This is what allows `(age.gt:13,or.(name.eq:john,name.neq:jane))` to be
/// split into exactly two tokens.
pub fn split_outside_brackets(s: &str) -> Vec<String> {
    split_on_top_level_commas(s, true)
}

fn split_on_top_level_commas(s: &str, track_brackets: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' if track_brackets && !in_quotes => depth += 1,
            ')' if track_brackets && !in_quotes => depth -= 1,
            // Negative depth (an unmatched closer) still counts as nested.
            ',' if !in_quotes && depth == 0 => {
                tokens.push(flush(&s[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }

    // Lenient trailing flush; unmatched quotes or brackets are not errors.
    if start != s.len() {
        tokens.push(flush(&s[start..]));
    }

    tokens
}

fn flush(token: &str) -> String {
    let (inner, _) = unquote(token, '"', '"');
    inner.to_string()
}

/// Joins values with commas, double-quoting any value that itself contains
/// a comma. Inverse of [`split_csv`] for values without embedded quotes.
pub fn join_csv<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| {
            let v = v.as_ref();
            if v.contains(',') {
                format!("\"{v}\"")
            } else {
                v.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_single_matching_pair() {
        assert_eq!(unquote("{a,b}", '{', '}'), ("a,b", true));
        assert_eq!(unquote("(x)", '(', ')'), ("x", true));
        assert_eq!(unquote("\"hi\"", '"', '"'), ("hi", true));
    }

    #[test]
    fn unquote_leaves_unmatched_input_alone() {
        assert_eq!(unquote("{a,b", '{', '}'), ("{a,b", false));
        assert_eq!(unquote("a,b}", '{', '}'), ("a,b}", false));
        assert_eq!(unquote("x", '(', ')'), ("x", false));
        assert_eq!(unquote("", '(', ')'), ("", false));
        // A single delimiter character is not a pair.
        assert_eq!(unquote("\"", '"', '"'), ("\"", false));
    }

    #[test]
    fn unquote_is_idempotent() {
        let (inner, stripped) = unquote("(a,b)", '(', ')');
        assert!(stripped);
        assert_eq!(unquote(inner, '(', ')'), ("a,b", false));
    }

    #[test]
    fn split_first_basics() {
        assert_eq!(split_first("age.gt", '.'), ("age", "gt"));
        assert_eq!(split_first("a.b.c", '.'), ("a", "b.c"));
        assert_eq!(split_first("plain", '.'), ("plain", ""));
        assert_eq!(split_first("", '.'), ("", ""));
    }

    #[test]
    fn split_csv_plain() {
        assert_eq!(split_csv("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_csv("one"), vec!["one"]);
    }

    #[test]
    fn split_csv_keeps_quoted_commas_and_strips_quotes() {
        assert_eq!(
            split_csv("alice,bob,\"charles, junior\""),
            vec!["alice", "bob", "charles, junior"]
        );
        assert_eq!(split_csv("\"a,b\",c"), vec!["a,b", "c"]);
    }

    #[test]
    fn split_csv_lenient_trailing_quote() {
        // Unmatched quote: the remainder is one token, quotes untouched.
        assert_eq!(split_csv("a,\"b,c"), vec!["a", "\"b,c"]);
    }

    #[test]
    fn split_csv_empty_input() {
        assert_eq!(split_csv(""), Vec::<String>::new());
    }

    #[test]
    fn split_csv_leading_and_trailing_commas() {
        assert_eq!(split_csv(",a"), vec!["", "a"]);
        assert_eq!(split_csv("a,"), vec!["a"]);
    }

    #[test]
    fn split_outside_brackets_keeps_nested_groups() {
        assert_eq!(
            split_outside_brackets("age.gt:13,or.(name.eq:john,name.neq:jane)"),
            vec!["age.gt:13", "or.(name.eq:john,name.neq:jane)"]
        );
    }

    #[test]
    fn split_outside_brackets_deep_nesting() {
        assert_eq!(
            split_outside_brackets("a.eq:1,and.(b.eq:2,or.(c.eq:3,d.eq:4)),e.eq:5"),
            vec!["a.eq:1", "and.(b.eq:2,or.(c.eq:3,d.eq:4))", "e.eq:5"]
        );
    }

    #[test]
    fn split_outside_brackets_unmatched_closer_swallows_the_rest() {
        // After an unmatched `)` the scanner stays "nested" and never
        // splits again, so malformed input degrades to one token.
        assert_eq!(split_outside_brackets("a)b,c"), vec!["a)b,c"]);
        assert_eq!(split_outside_brackets("a,b)c,d"), vec!["a", "b)c,d"]);
    }

    #[test]
    fn split_outside_brackets_quotes_inside_groups() {
        assert_eq!(
            split_outside_brackets("name.eq:\"doe, john\",age.gt:13"),
            vec!["name.eq:\"doe, john\"", "age.gt:13"]
        );
    }

    #[test]
    fn join_csv_quotes_embedded_commas() {
        assert_eq!(join_csv(&["a", "b,c", "d"]), "a,\"b,c\",d");
        assert_eq!(split_csv(&join_csv(&["a", "b,c", "d"])), vec!["a", "b,c", "d"]);
    }
}
