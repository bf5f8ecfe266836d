//! Query parameters and the workload request parsed from them.

use crate::error::ParamError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_ITERATIONS: i64 = 250_000;
pub const DEFAULT_SIZE_KB: i64 = 128;
pub const DEFAULT_DELAY_MS: i64 = 0;

/// Query parameters exactly as received, keyed by their original spelling.
///
/// Repeated keys keep the last value. Lookups through [`QueryParams::get`]
/// are case-insensitive, with an exact-case match taking precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.0.get(key) {
            return Some(value);
        }

        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Kind of synthetic work to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    Cpu,
    Io,
    Delay,
    None,
}

impl WorkloadKind {
    /// Maps an already lower-cased `workload` value. Anything unrecognised is `None`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "cpu" => Self::Cpu,
            "io" => Self::Io,
            "delay" => Self::Delay,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Io => "io",
            Self::Delay => "delay",
            Self::None => "none",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed request for one dispatch.
///
/// Numeric values are kept signed and echoed as given. A value that is zero
/// or negative makes the matching simulator a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadRequest {
    pub workload: WorkloadKind,
    /// Lower-cased `workload` value as echoed back; `"none"` when absent or empty.
    pub label: String,
    pub iterations: i64,
    pub size_kb: i64,
    pub delay_ms: i64,
}

impl Default for WorkloadRequest {
    fn default() -> Self {
        Self {
            workload: WorkloadKind::None,
            label: WorkloadKind::None.as_str().to_string(),
            iterations: DEFAULT_ITERATIONS,
            size_kb: DEFAULT_SIZE_KB,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl WorkloadRequest {
    /// Reads `workload`, `iterations`, `sizeKb` and `delayMs`.
    ///
    /// Absent or empty numeric values take their defaults. Anything else must
    /// parse as an integer; the workload value is only lower-cased.
    pub fn from_query(query: &QueryParams) -> Result<Self, ParamError> {
        let raw = query.get("workload").unwrap_or_default().to_lowercase();
        let workload = WorkloadKind::from_param(&raw);
        let label = if raw.is_empty() {
            WorkloadKind::None.as_str().to_string()
        } else {
            raw
        };

        Ok(Self {
            workload,
            label,
            iterations: parse_param(query, "iterations", DEFAULT_ITERATIONS)?,
            size_kb: parse_param(query, "sizeKb", DEFAULT_SIZE_KB)?,
            delay_ms: parse_param(query, "delayMs", DEFAULT_DELAY_MS)?,
        })
    }
}

fn parse_param(query: &QueryParams, name: &'static str, default: i64) -> Result<i64, ParamError> {
    match query.get(name).map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ParamError::Malformed {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let req = WorkloadRequest::from_query(&QueryParams::new()).unwrap();

        assert_eq!(req, WorkloadRequest::default());
        assert_eq!(req.label, "none");
        assert_eq!(req.iterations, 250_000);
        assert_eq!(req.size_kb, 128);
        assert_eq!(req.delay_ms, 0);
    }

    #[test]
    fn test_empty_values_take_defaults() {
        let q = query(&[("workload", ""), ("iterations", ""), ("sizeKb", " ")]);
        let req = WorkloadRequest::from_query(&q).unwrap();

        assert_eq!(req.workload, WorkloadKind::None);
        assert_eq!(req.label, "none");
        assert_eq!(req.iterations, DEFAULT_ITERATIONS);
        assert_eq!(req.size_kb, DEFAULT_SIZE_KB);
    }

    #[test]
    fn test_workload_is_lowercased() {
        let q = query(&[("workload", "CPU"), ("iterations", "1000")]);
        let req = WorkloadRequest::from_query(&q).unwrap();

        assert_eq!(req.workload, WorkloadKind::Cpu);
        assert_eq!(req.label, "cpu");
        assert_eq!(req.iterations, 1000);
    }

    #[test]
    fn test_unknown_workload_echoes_label() {
        let q = query(&[("workload", "GPU")]);
        let req = WorkloadRequest::from_query(&q).unwrap();

        assert_eq!(req.workload, WorkloadKind::None);
        assert_eq!(req.label, "gpu");
    }

    #[test]
    fn test_case_insensitive_keys() {
        let q = query(&[("Workload", "io"), ("SIZEKB", "4"), ("delayms", "7")]);
        let req = WorkloadRequest::from_query(&q).unwrap();

        assert_eq!(req.workload, WorkloadKind::Io);
        assert_eq!(req.size_kb, 4);
        assert_eq!(req.delay_ms, 7);
    }

    #[test]
    fn test_exact_key_wins_over_case_variant() {
        let q = query(&[("SizeKb", "2"), ("sizeKb", "3")]);
        assert_eq!(q.get("sizeKb"), Some("3"));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_repeated_key_keeps_last() {
        let q = query(&[("iterations", "1"), ("iterations", "2")]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.get("iterations"), Some("2"));
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        let q = query(&[("iterations", "abc")]);
        let err = WorkloadRequest::from_query(&q).unwrap_err();
        assert_eq!(
            err,
            ParamError::Malformed {
                name: "iterations",
                value: "abc".to_string()
            }
        );

        let q = query(&[("delayMs", "1.5")]);
        assert!(WorkloadRequest::from_query(&q).is_err());
    }

    #[test]
    fn test_non_positive_values_are_echoed() {
        let q = query(&[
            ("workload", "delay"),
            ("delayMs", "-5"),
            ("sizeKb", "0"),
            ("iterations", "0"),
        ]);
        let req = WorkloadRequest::from_query(&q).unwrap();

        assert_eq!(req.workload, WorkloadKind::Delay);
        assert_eq!(req.delay_ms, -5);
        assert_eq!(req.size_kb, 0);
        assert_eq!(req.iterations, 0);
    }

    #[test]
    fn test_unused_parameters_are_not_checked_for_range() {
        let q = query(&[("workload", "cpu"), ("sizeKb", "-1"), ("delayMs", "0")]);
        let req = WorkloadRequest::from_query(&q).unwrap();

        assert_eq!(req.workload, WorkloadKind::Cpu);
        assert_eq!(req.iterations, DEFAULT_ITERATIONS);
        assert_eq!(req.size_kb, -1);
    }

    #[test]
    fn test_workload_whitespace_is_kept() {
        let q = query(&[("workload", " cpu")]);
        let req = WorkloadRequest::from_query(&q).unwrap();

        assert_eq!(req.workload, WorkloadKind::None);
        assert_eq!(req.label, " cpu");
    }

    #[test]
    fn test_numbers_tolerate_surrounding_whitespace() {
        let q = query(&[("iterations", " 42 ")]);
        assert_eq!(WorkloadRequest::from_query(&q).unwrap().iterations, 42);
    }

    #[test]
    fn test_query_serializes_as_flat_object() {
        let q = query(&[("workload", "cpu"), ("extra", "1")]);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json, serde_json::json!({"workload": "cpu", "extra": "1"}));
    }
}
