use crate::dashboard::shortlist::ShortlistEntry;

/// Pretty JSON array of the shortlist, each entry carrying its reason.
pub fn shortlist_json(entries: &[ShortlistEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Renders the shortlist as a ready-to-send email body. The subject and intro
/// state the actual entry count rather than a fixed "5".
pub fn email_text(entries: &[ShortlistEntry]) -> String {
    let count = entries.len();
    let mut lines = vec![
        format!("Subject: Hiring Shortlist — {count} Candidates"),
        String::new(),
        "Hi team,".to_string(),
        String::new(),
        format!("I recommend we hire the following {count} candidates:"),
    ];
    for (i, entry) in entries.iter().enumerate() {
        let availability = &entry.candidate.work_availability;
        let availability = if availability.is_empty() {
            "N/A".to_string()
        } else {
            availability.join(", ")
        };
        lines.push(format!("{}. {} — {availability}", i + 1, entry.name()));
        lines.push(format!("   Reason: {}", entry.reason()));
        lines.push(String::new());
    }
    lines.push("— End of shortlist".to_string());
    lines.join("\n")
}
