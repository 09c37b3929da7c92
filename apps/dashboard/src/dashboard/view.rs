//! Derived candidate views: availability filter, free-text search, optional
//! experience sort. Pure over the fetched snapshot.

use std::fmt;
use std::str::FromStr;

use crate::models::candidate::Candidate;

/// Number of rows in the "top candidates" summary.
pub const TOP_CANDIDATES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Keep the filtered order.
    #[default]
    None,
    /// Most work experiences first; ties keep their relative order.
    Experience,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SortMode::None),
            "experience" => Ok(SortMode::Experience),
            other => Err(format!("unknown sort mode '{other}' (expected none or experience)")),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::None => write!(f, "none"),
            SortMode::Experience => write!(f, "experience"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Case-insensitive substring matched against name and "role company".
    pub query: String,
    /// Availability tag every shown candidate must carry.
    pub availability: Option<String>,
    pub sort: SortMode,
}

impl ViewFilter {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(tag) = self.availability.as_deref().filter(|t| !t.is_empty()) {
            if !candidate.is_available(tag) {
                return false;
            }
        }
        if self.query.is_empty() {
            return true;
        }
        let q = self.query.to_lowercase();
        if candidate.name.to_lowercase().contains(&q) {
            return true;
        }
        candidate
            .work_experiences
            .iter()
            .any(|e| format!("{} {}", e.role, e.company).to_lowercase().contains(&q))
    }
}

/// Returns the displayed list for `filter`. `records` is never mutated.
pub fn derive_view(records: &[Candidate], filter: &ViewFilter) -> Vec<Candidate> {
    let mut view: Vec<Candidate> = records
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect();
    if filter.sort == SortMode::Experience {
        // sort_by_key is stable
        view.sort_by_key(|c| std::cmp::Reverse(c.experience_count()));
    }
    view
}

pub fn top_candidates(view: &[Candidate]) -> &[Candidate] {
    &view[..view.len().min(TOP_CANDIDATES)]
}
