//! # Query Parameters
//!
//! Multi-valued query-string access with strict parsing. Repeated keys
//! (`?case=A&case=B`) keep every value; empty values are treated as absent,
//! except for boolean flags, which reject them.

use chrono::NaiveDate;
use std::str::FromStr;

use crate::error::{ProcessMiningError, Result};

/// Decoded query string of a request, together with the request path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    path: String,
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new(path: impl Into<String>, pairs: Vec<(String, String)>) -> Self {
        Self {
            path: path.into(),
            pairs,
        }
    }

    /// Decode a raw `application/x-www-form-urlencoded` query string
    pub fn parse(path: impl Into<String>, raw_query: Option<&str>) -> Self {
        let pairs = raw_query
            .map(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .map(|(key, value)| (key.into_owned(), value.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self::new(path, pairs)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// All non-empty values of `key`, in request order
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.all_of(&[key])
    }

    /// All non-empty values under any of `keys` (for aliased parameters)
    pub fn all_of(&self, keys: &[&str]) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// All non-empty values of `key` as owned strings
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.all(key).into_iter().map(str::to_string).collect()
    }

    /// First non-empty value of `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.all(key).into_iter().next()
    }

    /// Strict boolean flag: only the literals `true` and `false` are accepted.
    ///
    /// Raw values are checked untrimmed, so an empty value is rejected rather
    /// than read as absent. Repeats must agree.
    pub fn flag(&self, key: &str) -> Result<Option<bool>> {
        let mut flag = None;
        for (_, raw) in self.pairs.iter().filter(|(k, _)| k == key) {
            let value = match raw.as_str() {
                "true" => true,
                "false" => false,
                other => {
                    return Err(ProcessMiningError::validation(format!(
                        "Invalid value '{other}' for '{key}'. Use 'true' or 'false'."
                    )))
                }
            };
            if flag.is_some_and(|previous| previous != value) {
                return Err(ProcessMiningError::validation(format!(
                    "Conflicting values for '{key}'. Send it once."
                )));
            }
            flag = Some(value);
        }
        Ok(flag)
    }

    /// Calendar date in `YYYY-MM-DD` form
    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>> {
        self.first(key).map(|raw| parse_date(key, raw)).transpose()
    }

    /// Integer greater than zero
    pub fn positive_int(&self, key: &str) -> Result<Option<u64>> {
        self.first(key)
            .map(|raw| parse_positive(key, raw))
            .transpose()
    }

    /// Every value of `key`, each parsed with `FromStr`
    pub fn parsed<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.all(key)
            .into_iter()
            .map(|raw| {
                raw.parse::<T>().map_err(|e| {
                    ProcessMiningError::validation(format!("Invalid value for '{key}': {e}"))
                })
            })
            .collect()
    }

    /// Every value of `key` parsed as a positive integer
    pub fn positive_ints(&self, key: &str) -> Result<Vec<u64>> {
        self.all(key)
            .into_iter()
            .map(|raw| parse_positive(key, raw))
            .collect()
    }

    /// Single value of `key` parsed with `FromStr`, if present
    pub fn parsed_one<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parsed::<T>(key)?.into_iter().next())
    }

    /// Query string with `page` replaced by the given value; other pairs keep their order
    pub fn with_page(&self, page: u64) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs.iter().filter(|(k, _)| k != "page") {
            serializer.append_pair(key, value);
        }
        serializer.append_pair("page", &page.to_string());
        serializer.finish()
    }
}

fn parse_date(key: &str, raw: &str) -> Result<NaiveDate> {
    // chrono accepts single-digit months and days; the wire format does not
    let well_formed = raw.len() == 10
        && raw
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    if !well_formed {
        return Err(invalid_date(key, raw));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid_date(key, raw))
}

fn invalid_date(key: &str, raw: &str) -> ProcessMiningError {
    ProcessMiningError::validation(format!(
        "Invalid date '{raw}' for '{key}'. Use YYYY-MM-DD."
    ))
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ProcessMiningError::validation(format!(
            "Invalid value '{raw}' for '{key}'. Expected a positive integer."
        ))),
    }
}
