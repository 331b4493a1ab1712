//! Activity codes and prefix matching.
//!
//! The code list is data: it is loaded from the store for each run and
//! passed in explicitly.

use serde::Serialize;

/// Outcome of resolving user input against the known codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActivityMatch {
    /// Input is already a known code.
    Exact(String),
    /// Input is a prefix of exactly one known code.
    Prefix(String),
    /// Input is a prefix of several codes; kept as typed.
    Ambiguous {
        input: String,
        candidates: Vec<String>,
    },
    /// Input matches nothing; it becomes a new code.
    New(String),
}

impl ActivityMatch {
    /// The code to store.
    pub fn code(&self) -> &str {
        match self {
            Self::Exact(code) | Self::Prefix(code) | Self::New(code) => code,
            Self::Ambiguous { input, .. } => input,
        }
    }

    pub fn into_code(self) -> String {
        match self {
            Self::Exact(code) | Self::Prefix(code) | Self::New(code) => code,
            Self::Ambiguous { input, .. } => input,
        }
    }
}

/// Distinct activity codes, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCodes {
    codes: Vec<String>,
}

impl ActivityCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut codes: Vec<String> = codes
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.is_empty())
            .collect();
        codes.sort();
        codes.dedup();
        Self { codes }
    }

    /// Choice list for display.
    pub fn choices(&self) -> &[String] {
        &self.codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.binary_search_by(|c| c.as_str().cmp(code)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Resolve input to a code: exact, then unique prefix, else as typed.
    pub fn resolve(&self, input: &str) -> ActivityMatch {
        let input = input.trim();
        if self.contains(input) {
            return ActivityMatch::Exact(input.to_string());
        }

        let candidates: Vec<&String> = self
            .codes
            .iter()
            .filter(|code| code.starts_with(input))
            .collect();

        match candidates.as_slice() {
            [] => ActivityMatch::New(input.to_string()),
            [only] => ActivityMatch::Prefix((*only).clone()),
            many => ActivityMatch::Ambiguous {
                input: input.to_string(),
                candidates: many.iter().map(|c| (*c).clone()).collect(),
            },
        }
    }

    /// Register a code so later prefixes can resolve to it.
    pub fn insert(&mut self, code: &str) {
        if let Err(pos) = self.codes.binary_search_by(|c| c.as_str().cmp(code)) {
            self.codes.insert(pos, code.to_string());
        }
    }
}
