//! Collection of problems raised while merging a fragment
//!
//! A merge never fails on the first problem. Every issue is recorded with
//! its [`Severity`]; once the merge is done, [`ProblemCollector::report`]
//! logs the warnings and turns any error or fatal into a single
//! [`Error::MergeProblems`].

use std::fmt;

use log::warn;

use crate::error::{Error, Result};

/// Severity of a merge problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// Accumulates merge problems in collection order, per severity
#[derive(Debug, Clone, Default)]
pub struct ProblemCollector {
    warnings: Vec<String>,
    errors: Vec<String>,
    fatals: Vec<String>,
}

impl ProblemCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Warning => self.warnings.push(message),
            Severity::Error => self.errors.push(message),
            Severity::Fatal => self.fatals.push(message),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.add(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Severity::Error, message);
    }

    pub fn fatal(&mut self, message: impl Into<String>) {
        self.add(Severity::Fatal, message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn fatals(&self) -> &[String] {
        &self.fatals
    }

    /// True iff no error and no fatal was collected
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.fatals.is_empty()
    }

    /// Log every warning, then fail if any error or fatal was collected
    ///
    /// `gav` names the fragment whose merge produced the problems.
    pub fn report(self, gav: &str) -> Result<()> {
        for warning in &self.warnings {
            warn!("{}: {}", gav, warning);
        }

        if self.is_ok() {
            return Ok(());
        }

        let mut problems = self.errors;
        problems.extend(self.fatals);
        Err(Error::MergeProblems {
            gav: gav.to_string(),
            problems,
        })
    }
}
