use crate::models::candidate::{Candidate, FULL_TIME};

/// Role keywords that signal seniority. Matched as case-insensitive substrings.
const LEADERSHIP_KEYWORDS: [&str; 5] = ["senior", "lead", "principal", "manager", "architect"];

/// Proposes a shortlist justification for `candidate`. First matching rule wins.
pub fn suggest_reason(candidate: &Candidate) -> &'static str {
    let has_leadership_role = candidate.work_experiences.iter().any(|e| {
        let role = e.role.to_lowercase();
        LEADERSHIP_KEYWORDS.iter().any(|kw| role.contains(kw))
    });

    match candidate.experience_count() {
        _ if has_leadership_role => "Senior experience and leadership potential",
        n if n >= 5 => "Highly experienced across multiple roles",
        n if n >= 3 => "Experienced candidate with relevant roles",
        _ if candidate.is_available(FULL_TIME) => "Available full-time and promising",
        _ => "Promising candidate",
    }
}
