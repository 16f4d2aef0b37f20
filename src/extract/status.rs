// src/extract/status.rs
//! PEP status consistency: the index letter against the detail page.

use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error;

use super::StatusCount;
use crate::error::Result;

/// Status-code letter → full status names acceptable for it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ExpectedStatuses(BTreeMap<String, Vec<String>>);

impl Default for ExpectedStatuses {
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            ("A", &["Active", "Accepted"]),
            ("D", &["Deferred"]),
            ("F", &["Final"]),
            ("P", &["Provisional"]),
            ("R", &["Rejected"]),
            ("S", &["Superseded"]),
            ("W", &["Withdrawn"]),
            ("", &["Draft", "Active"]),
        ];
        Self(
            table
                .iter()
                .map(|(code, names)| {
                    (
                        code.to_string(),
                        names.iter().map(|n| n.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl ExpectedStatuses {
    /// Load a replacement table from a JSON object such as `{"F": ["Final"]}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Acceptable names for `code`; empty for letters the table does not know.
    pub fn expected(&self, code: &str) -> &[String] {
        self.0.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn check(&self, code: &str, pep_status: &str) -> StatusCheck {
        let expected = self.expected(code);
        if expected.iter().any(|s| s == pep_status) {
            StatusCheck::Consistent
        } else {
            StatusCheck::Violation(StatusMismatch {
                code: code.to_string(),
                pep_status: pep_status.to_string(),
                expected: expected.to_vec(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusCheck {
    Consistent,
    Violation(StatusMismatch),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("mismatched status: detail page says {pep_status:?}, index letter {code:?} expects one of {expected:?}")]
pub struct StatusMismatch {
    pub code: String,
    pub pep_status: String,
    pub expected: Vec<String>,
}

/// Occurrences per status, in order of first encounter.
#[derive(Debug, Default)]
pub struct StatusTally {
    counts: Vec<(String, usize)>,
}

impl StatusTally {
    pub fn record(&mut self, status: &str) {
        match self.counts.iter_mut().find(|(s, _)| s == status) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((status.to_string(), 1)),
        }
    }

    pub fn get(&self, status: &str) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| s == status)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn finish(self) -> Vec<StatusCount> {
        self.counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect()
    }
}
