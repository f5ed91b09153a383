//! The query value model: [`QueryValue`] and the ordered [`QueryParams`] mapping.

use chrono::{NaiveDate, NaiveDateTime};

/// Separator used when a list value is rendered into a single parameter.
pub const LIST_SEPARATOR: &str = ";";

/// A single typed query parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    /// Rendered as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Rendered as `YYYYMMDDHHMM` (no seconds).
    Timestamp(NaiveDateTime),
    /// An enumerated symbol, carried as its wire value.
    Symbol(&'static str),
    List(Vec<String>),
}

impl QueryValue {
    /// Renders the value as it appears on the wire. Spaces become `+`.
    pub fn encode(&self) -> String {
        let raw = match self {
            QueryValue::Text(s) => s.clone(),
            QueryValue::Integer(i) => i.to_string(),
            QueryValue::Boolean(b) => b.to_string(),
            QueryValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            QueryValue::Timestamp(t) => t.format("%Y%m%d%H%M").to_string(),
            QueryValue::Symbol(s) => (*s).to_string(),
            QueryValue::List(items) => items.join(LIST_SEPARATOR),
        };
        raw.replace(' ', "+")
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Text(value.clone())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Integer(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Integer(value.into())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Boolean(value)
    }
}

impl From<NaiveDate> for QueryValue {
    fn from(value: NaiveDate) -> Self {
        QueryValue::Date(value)
    }
}

impl From<NaiveDateTime> for QueryValue {
    fn from(value: NaiveDateTime) -> Self {
        QueryValue::Timestamp(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl From<&[String]> for QueryValue {
    fn from(value: &[String]) -> Self {
        QueryValue::List(value.to_vec())
    }
}

impl From<&[&str]> for QueryValue {
    fn from(value: &[&str]) -> Self {
        QueryValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Ordered mapping from parameter name to an optional value.
///
/// Inserting a name that is already present replaces its value but keeps the
/// original position. Absent values are kept until encoding so that callers
/// can pass optional parameters straight through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    pub fn insert(&mut self, name: &str, value: impl Into<QueryValue>) -> &mut Self {
        self.set(name, Some(value.into()))
    }

    /// Sets `name` to `value`, recording an absent entry when `value` is `None`.
    pub fn insert_opt<V: Into<QueryValue>>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        self.set(name, value.map(Into::into))
    }

    /// Inserts a list only when it is non-empty.
    pub fn insert_list(&mut self, name: &str, values: &[String]) -> &mut Self {
        if values.is_empty() {
            self.set(name, None)
        } else {
            self.set(name, Some(QueryValue::List(values.to_vec())))
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: &str, value: impl Into<QueryValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style [`insert_opt`](Self::insert_opt).
    pub fn with_opt<V: Into<QueryValue>>(mut self, name: &str, value: Option<V>) -> Self {
        self.insert_opt(name, value);
        self
    }

    /// Merges `other` into `self` entry by entry, in `other`'s order.
    pub fn extend(&mut self, other: QueryParams) {
        for (name, value) in other.entries {
            self.set(&name, value);
        }
    }

    /// The value stored under `name`, if present and not absent.
    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Whether `name` was inserted, including as an absent entry.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Entries with a value, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries
            .iter()
            .filter_map(|(n, v)| v.as_ref().map(|v| (n.as_str(), v)))
    }

    /// Number of entries, including absent ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set(&mut self, name: &str, value: Option<QueryValue>) -> &mut Self {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_each_variant() {
        assert_eq!(QueryValue::from("GNPCA").encode(), "GNPCA");
        assert_eq!(QueryValue::from(125).encode(), "125");
        assert_eq!(QueryValue::from(true).encode(), "true");
        assert_eq!(QueryValue::from(false).encode(), "false");
        assert_eq!(QueryValue::Symbol("lin").encode(), "lin");

        let date = NaiveDate::from_ymd_opt(2020, 7, 4).unwrap();
        assert_eq!(QueryValue::from(date).encode(), "2020-07-04");

        let ts = NaiveDate::from_ymd_opt(2018, 3, 2)
            .unwrap()
            .and_hms_opt(2, 20, 59)
            .unwrap();
        assert_eq!(QueryValue::from(ts).encode(), "201803020220");
    }

    #[test]
    fn list_joined_with_separator() {
        let value = QueryValue::from(&["slovenia", "food", "oecd"][..]);
        assert_eq!(value.encode(), "slovenia;food;oecd");
    }

    #[test]
    fn spaces_become_plus_everywhere() {
        assert_eq!(QueryValue::from("money stock").encode(), "money+stock");
        let value = QueryValue::from(vec!["a b".to_string(), "c".to_string()]);
        assert_eq!(value.encode(), "a+b;c");
        assert_eq!(QueryValue::from("a,b/c:d").encode(), "a,b/c:d");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = QueryParams::new();
        params.insert("a", 1).insert("b", 2).insert("a", 3);
        let present: Vec<_> = params.present().map(|(n, v)| (n, v.encode())).collect();
        assert_eq!(
            present,
            vec![("a", "3".to_string()), ("b", "2".to_string())]
        );
    }

    #[test]
    fn absent_entries_are_kept_but_not_present() {
        let params = QueryParams::new()
            .with("series_id", "GNPCA")
            .with_opt::<i64>("limit", None);
        assert_eq!(params.len(), 2);
        assert!(params.contains("limit"));
        assert!(params.get("limit").is_none());
        assert_eq!(params.present().count(), 1);
    }

    #[test]
    fn empty_list_is_absent() {
        let mut params = QueryParams::new();
        params.insert_list("tag_names", &[]);
        assert!(params.get("tag_names").is_none());
    }
}
