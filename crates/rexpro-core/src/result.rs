//! Evaluation results and their normalization into display lines.
//!
//! A script evaluation produces a `ResultValue` plus any text the script wrote
//! while running (`Evaluation::output`). `normalize` turns the pair into the
//! ordered lines carried by a script response. It always yields at least one
//! line: an empty result becomes `[""]` so "nothing happened" is never framed
//! as zero bytes.
//!
//! Failures are two-tier. `try_normalize` reports a null array element or map
//! value as `RexProError::ElementToText`; `normalize` converts that error into
//! a single line of text, once, and never fails.

use std::fmt;

use crate::error::{Result, RexProError};

/// Shape of an evaluation result.
pub enum ResultValue {
    /// Absent result.
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Iterable collection; null elements render as `null`.
    Sequence(Vec<ResultValue>),
    /// Single-pass cursor, drained in order; null elements render as `null`.
    Cursor(Box<dyn Iterator<Item = ResultValue> + Send>),
    /// Fixed-size array; null elements are an error.
    Array(Vec<ResultValue>),
    /// Key/value pairs in iteration order; null values are an error.
    Map(Vec<(String, ResultValue)>),
    /// Failure value, shown by its message only.
    Error(String),
}

impl ResultValue {
    /// Wrap a single-pass iterator.
    pub fn cursor<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = ResultValue>,
        I::IntoIter: Send + 'static,
    {
        ResultValue::Cursor(Box::new(iter.into_iter()))
    }

    /// Build a map from ordered pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ResultValue)>,
    {
        ResultValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Debug for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Null => f.write_str("Null"),
            ResultValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            ResultValue::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            ResultValue::Float(x) => f.debug_tuple("Float").field(x).finish(),
            ResultValue::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            ResultValue::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            ResultValue::Cursor(_) => f.write_str("Cursor(..)"),
            ResultValue::Array(items) => f.debug_tuple("Array").field(items).finish(),
            ResultValue::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            ResultValue::Error(msg) => f.debug_tuple("Error").field(msg).finish(),
        }
    }
}

impl From<&str> for ResultValue {
    fn from(s: &str) -> Self {
        ResultValue::Text(s.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(s: String) -> Self {
        ResultValue::Text(s)
    }
}

impl From<i64> for ResultValue {
    fn from(i: i64) -> Self {
        ResultValue::Integer(i)
    }
}

impl From<i32> for ResultValue {
    fn from(i: i32) -> Self {
        ResultValue::Integer(i64::from(i))
    }
}

impl From<f64> for ResultValue {
    fn from(x: f64) -> Self {
        ResultValue::Float(x)
    }
}

impl From<bool> for ResultValue {
    fn from(b: bool) -> Self {
        ResultValue::Boolean(b)
    }
}

impl<T: Into<ResultValue>> From<Option<T>> for ResultValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ResultValue::Null, Into::into)
    }
}

impl<T: Into<ResultValue>> From<Vec<T>> for ResultValue {
    fn from(items: Vec<T>) -> Self {
        ResultValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for ResultValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => ResultValue::Null,
            Value::Bool(b) => ResultValue::Boolean(b),
            // Integers outside i64 keep their exact digits.
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => ResultValue::Integer(i),
                (None, Some(x)) if n.is_f64() => ResultValue::Float(x),
                _ => ResultValue::Text(n.to_string()),
            },
            Value::String(s) => ResultValue::Text(s),
            Value::Array(items) => items.into(),
            Value::Object(map) => ResultValue::map(map.into_iter().map(|(k, v)| (k, v.into()))),
        }
    }
}

/// Result value plus text captured while it was being produced.
#[derive(Debug)]
pub struct Evaluation {
    pub value: ResultValue,
    pub output: String,
}

impl Evaluation {
    pub fn new(value: impl Into<ResultValue>) -> Self {
        Self {
            value: value.into(),
            output: String::new(),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }
}

/// Normalize, reporting null-element violations as errors.
pub fn try_normalize(eval: Evaluation) -> Result<Vec<String>> {
    let entries = result_entries(eval.value)?;
    let mut lines = incidental_lines(&eval.output);

    let empty_result = match entries.as_slice() {
        [] | [None] => true,
        [Some(text)] => text.is_empty(),
        _ => false,
    };

    if empty_result {
        if lines.is_empty() {
            lines.push(String::new());
        }
    } else {
        lines.extend(entries.into_iter().map(|e| e.unwrap_or_else(|| "null".to_string())));
    }
    Ok(lines)
}

/// Normalize into display lines. Never fails: an error becomes its message.
pub fn normalize(eval: Evaluation) -> Vec<String> {
    match try_normalize(eval) {
        Ok(lines) => lines,
        Err(e) => {
            tracing::debug!(error = %e, "result normalization failed");
            vec![e.to_string()]
        }
    }
}

// One entry per top-level item; `None` marks a null source value.
fn result_entries(value: ResultValue) -> Result<Vec<Option<String>>> {
    let entries = match value {
        ResultValue::Null => Vec::new(),
        ResultValue::Sequence(items) => items.into_iter().map(nullable_text).collect(),
        ResultValue::Cursor(iter) => iter.map(nullable_text).collect(),
        ResultValue::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(ix, item)| match item {
                ResultValue::Null => Err(RexProError::ElementToText(format!(
                    "array element {ix} is null"
                ))),
                other => Ok(Some(to_text(other))),
            })
            .collect::<Result<_>>()?,
        ResultValue::Map(pairs) => pairs
            .into_iter()
            .map(|(key, item)| match item {
                ResultValue::Null => Err(RexProError::ElementToText(format!(
                    "map value for key '{key}' is null"
                ))),
                other => Ok(Some(format!("{key}={}", to_text(other)))),
            })
            .collect::<Result<_>>()?,
        ResultValue::Error(msg) => vec![Some(msg)],
        scalar @ (ResultValue::Text(_)
        | ResultValue::Integer(_)
        | ResultValue::Float(_)
        | ResultValue::Boolean(_)) => vec![Some(to_text(scalar))],
    };
    Ok(entries)
}

fn nullable_text(value: ResultValue) -> Option<String> {
    match value {
        ResultValue::Null => None,
        other => Some(to_text(other)),
    }
}

/// Textual form of a (possibly nested) value. Nested nulls print as `null`.
pub fn to_text(value: ResultValue) -> String {
    match value {
        ResultValue::Null => "null".to_string(),
        ResultValue::Text(s) => s,
        ResultValue::Integer(i) => i.to_string(),
        ResultValue::Float(x) => float_text(x),
        ResultValue::Boolean(b) => b.to_string(),
        ResultValue::Sequence(items) | ResultValue::Array(items) => {
            bracketed(items.into_iter().map(to_text))
        }
        ResultValue::Cursor(iter) => bracketed(iter.map(to_text)),
        ResultValue::Map(pairs) => {
            let inner: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{k}={}", to_text(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        ResultValue::Error(msg) => msg,
    }
}

fn bracketed(items: impl Iterator<Item = String>) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(", "))
}

// Shortest round-trip digits, always with a fractional part. Magnitudes
// outside [1e-3, 1e7) use `E` notation: `1.0E7`, `1.5E-4`.
fn float_text(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let abs = x.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        let mut s = x.to_string();
        if !s.contains('.') {
            s.push_str(".0");
        }
        return s;
    }

    let sci = format!("{x:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if mantissa.contains('.') => format!("{mantissa}E{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}.0E{exp}"),
        None => sci,
    }
}

// Split on '\n', dropping trailing empty pieces. Output whose first piece is
// empty contributes nothing.
fn incidental_lines(output: &str) -> Vec<String> {
    let mut pieces: Vec<&str> = output.split('\n').collect();
    while pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    match pieces.first() {
        Some(first) if !first.is_empty() => pieces.into_iter().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::ErrorKind;

    fn lines(value: impl Into<ResultValue>, output: &str) -> Vec<String> {
        normalize(Evaluation::new(value).with_output(output))
    }

    #[test]
    fn null_and_empty_give_placeholder() {
        assert_eq!(lines(ResultValue::Null, ""), vec![""]);
        assert_eq!(lines(Vec::<ResultValue>::new(), ""), vec![""]);
        assert_eq!(lines("", ""), vec![""]);
        assert_eq!(lines(vec![ResultValue::Null], ""), vec![""]);
    }

    #[test]
    fn incidental_output_leads() {
        assert_eq!(lines(42, "foo\nbar"), vec!["foo", "bar", "42"]);
        assert_eq!(lines(42, "foo\nbar\n\n"), vec!["foo", "bar", "42"]);
    }

    #[test]
    fn incidental_output_replaces_placeholder() {
        assert_eq!(lines(ResultValue::Null, "printed"), vec!["printed"]);
    }

    #[test]
    fn output_starting_with_newline_is_ignored() {
        assert_eq!(lines(1, "\nlate"), vec!["1"]);
    }

    #[test]
    fn sequence_nulls_become_text() {
        let v = vec![ResultValue::from("a"), ResultValue::Null, 3.into()];
        assert_eq!(lines(v, ""), vec!["a", "null", "3"]);
    }

    #[test]
    fn cursor_is_drained_in_order() {
        let v = ResultValue::cursor((1..=3).map(ResultValue::from));
        assert_eq!(lines(v, ""), vec!["1", "2", "3"]);
    }

    #[test]
    fn map_renders_key_equals_value() {
        let v = ResultValue::map([("a", 1.into()), ("b", 2.into())]);
        assert_eq!(lines(v, ""), vec!["a=1", "b=2"]);
    }

    #[test]
    fn null_array_element_is_typed_error() {
        let v = ResultValue::Array(vec!["x".into(), ResultValue::Null]);
        let err = try_normalize(Evaluation::new(v)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ElementToText);
    }

    #[test]
    fn null_map_value_becomes_single_message_line() {
        let v = ResultValue::map([("k", ResultValue::Null)]);
        let out = lines(v, "ignored");
        assert_eq!(out, vec!["map value for key 'k' is null"]);
    }

    #[test]
    fn error_shows_message_only() {
        assert_eq!(lines(ResultValue::Error("boom".into()), ""), vec!["boom"]);
    }

    #[test]
    fn nested_values_render_inline() {
        let v = ResultValue::Array(vec![
            vec![ResultValue::from(1), ResultValue::Null].into(),
            ResultValue::map([("w", 0.5.into())]),
            2.0.into(),
            true.into(),
        ]);
        assert_eq!(lines(v, ""), vec!["[1, null]", "{w=0.5}", "2.0", "true"]);
    }

    #[test]
    fn json_values_convert() {
        let v: ResultValue = serde_json::json!({"name": "marko", "age": 29, "tags": [null]}).into();
        assert_eq!(lines(v, ""), vec!["name=marko", "age=29", "tags=[null]"]);

        let huge: ResultValue = serde_json::json!(u64::MAX).into();
        assert_eq!(lines(huge, ""), vec!["18446744073709551615"]);
        let real: ResultValue = serde_json::json!(1.5).into();
        assert_eq!(lines(real, ""), vec!["1.5"]);
    }

    #[test]
    fn large_and_small_floats_use_exponent_form() {
        assert_eq!(to_text(1e7.into()), "1.0E7");
        assert_eq!(to_text(1.5e10.into()), "1.5E10");
        assert_eq!(to_text(0.0001.into()), "1.0E-4");
        assert_eq!(to_text((-2.5e-5).into()), "-2.5E-5");
        assert_eq!(to_text(9999999.0.into()), "9999999.0");
        assert_eq!(to_text(0.001.into()), "0.001");
        assert_eq!(to_text(0.0.into()), "0.0");
        assert_eq!(to_text(f64::NEG_INFINITY.into()), "-Infinity");
    }

    #[test]
    fn always_at_least_one_line() {
        let shapes: Vec<ResultValue> = vec![
            ResultValue::Null,
            Vec::<ResultValue>::new().into(),
            vec![ResultValue::Null, ResultValue::Null].into(),
            ResultValue::map(Vec::<(String, ResultValue)>::new()),
            ResultValue::Error(String::new()),
            ResultValue::Array(vec![ResultValue::Null]),
            ResultValue::cursor(std::iter::empty()),
            7.into(),
        ];
        for v in shapes {
            assert!(!normalize(Evaluation::new(v)).is_empty());
        }
    }
}
