//! Sample selection values.
//!
//! A selector is built from repeatable, comma-separated options such as
//! `-t A,B -t 3`. Flattening happens once, here, so consumers only ever see
//! one ordered sequence.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// One sample reference, tagged by how it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleId {
    /// 0-based column position among the count table samples.
    Index(usize),
    /// Sample label from the count table header.
    Label(String),
}

impl SampleId {
    /// Tag a raw token. Tokens made only of ASCII digits are indices.
    ///
    /// Tagging is purely lexical: a header label that happens to look like a
    /// number is still read as an index here.
    pub fn from_token(token: &str) -> Self {
        if !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
            && let Ok(index) = token.parse()
        {
            return Self::Index(index);
        }
        Self::Label(token.to_string())
    }

    /// Position of this sample within `header`, if it names one.
    pub fn position_in(&self, header: &[String]) -> Option<usize> {
        match self {
            Self::Index(i) => (*i < header.len()).then_some(*i),
            Self::Label(label) => header.iter().position(|h| h == label),
        }
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Ordered, duplicate-free list of sample references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SampleSelector(Vec<SampleId>);

impl SampleSelector {
    /// Flatten repeated comma-separated values into one selector.
    ///
    /// Blank pieces (as in `"A,,B"` or a trailing comma) are dropped.
    /// A sample referenced twice is rejected with the duplicate's text.
    pub fn flatten<S: AsRef<str>>(values: &[S]) -> Result<Self, String> {
        Self::collect(values, SampleId::from_token)
    }

    /// Like [`flatten`](Self::flatten), but every token is a label.
    ///
    /// Used where the values are sample names by construction, such as the
    /// fastq sample IDs that become count table columns.
    pub fn labels<S: AsRef<str>>(values: &[S]) -> Result<Self, String> {
        Self::collect(values, |token| SampleId::Label(token.to_string()))
    }

    fn collect<S: AsRef<str>>(
        values: &[S],
        tag: impl Fn(&str) -> SampleId,
    ) -> Result<Self, String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for token in values
            .iter()
            .flat_map(|v| v.as_ref().split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            let id = tag(token);
            if !seen.insert(id.clone()) {
                return Err(format!("sample '{token}' is listed more than once"));
            }
            ids.push(id);
        }
        Ok(Self(ids))
    }

    /// Selected samples in input order.
    pub fn ids(&self) -> &[SampleId] {
        &self.0
    }

    /// Number of selected samples.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `id` is part of this selection.
    pub fn contains(&self, id: &SampleId) -> bool {
        self.0.contains(id)
    }
}

/// How the control samples of a statistical test are chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "samples")]
pub enum ControlSelection {
    /// Samples named with `--control-id`.
    Explicit(SampleSelector),
    /// Every sample of the count table that is not a treatment sample.
    ComplementOfTreatment,
}

impl ControlSelection {
    /// Resolve the control samples against the sample labels of a count
    /// table header.
    ///
    /// Explicit selections are returned as labels in the order given. The
    /// complement keeps header order. Fails with the unresolvable reference
    /// when a treatment or control sample is not in `header`.
    pub fn resolve(
        &self,
        header: &[String],
        treatment: &SampleSelector,
    ) -> Result<Vec<String>, SampleId> {
        match self {
            Self::Explicit(selector) => selector
                .ids()
                .iter()
                .map(|id| {
                    id.position_in(header)
                        .map(|pos| header[pos].clone())
                        .ok_or_else(|| id.clone())
                })
                .collect(),
            Self::ComplementOfTreatment => {
                let mut excluded = HashSet::new();
                for id in treatment.ids() {
                    excluded.insert(id.position_in(header).ok_or_else(|| id.clone())?);
                }
                Ok(header
                    .iter()
                    .enumerate()
                    .filter(|(pos, _)| !excluded.contains(pos))
                    .map(|(_, label)| label.clone())
                    .collect())
            }
        }
    }
}
