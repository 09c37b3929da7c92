//! Dashboard session state: the fetched snapshot, UI filters, the
//! new-candidate form, notices, and the injected shortlist.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::dashboard::client::ApiClient;
use crate::dashboard::shortlist::{ShortlistManager, ShortlistStorage};
use crate::dashboard::view::{derive_view, top_candidates, ViewFilter};
use crate::models::candidate::{Candidate, NewCandidate, WorkExperience};

/// How long a success notice stays visible.
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// Success notices clear themselves; errors stay until dismissed.
    pub expires_at: Option<Instant>,
}

/// The add-candidate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateForm {
    pub name: String,
    pub availability: BTreeSet<String>,
    pub experiences: Vec<WorkExperience>,
}

impl Default for CandidateForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            availability: BTreeSet::new(),
            experiences: vec![WorkExperience::default()],
        }
    }
}

impl CandidateForm {
    pub fn toggle_availability(&mut self, tag: &str) {
        if !self.availability.remove(tag) {
            self.availability.insert(tag.to_string());
        }
    }

    pub fn add_experience_row(&mut self) {
        self.experiences.push(WorkExperience::default());
    }

    pub fn remove_experience_row(&mut self, index: usize) {
        if index < self.experiences.len() {
            self.experiences.remove(index);
        }
    }

    pub fn update_experience(&mut self, index: usize, role: Option<&str>, company: Option<&str>) {
        if let Some(row) = self.experiences.get_mut(index) {
            if let Some(role) = role {
                row.role = role.to_string();
            }
            if let Some(company) = company {
                row.company = company.to_string();
            }
        }
    }

    /// Trimmed request body; rows with neither role nor company are dropped.
    pub fn to_payload(&self) -> NewCandidate {
        let work_experiences = self
            .experiences
            .iter()
            .map(|e| WorkExperience {
                role: e.role.trim().to_string(),
                company: e.company.trim().to_string(),
            })
            .filter(|e| !e.role.is_empty() || !e.company.is_empty())
            .collect();
        NewCandidate {
            name: Some(self.name.trim().to_string()),
            work_availability: self.availability.iter().cloned().collect(),
            work_experiences,
            ..Default::default()
        }
    }
}

/// One user's dashboard. The snapshot is replaced wholesale on refresh and
/// merged optimistically on create/update.
pub struct DashboardSession<S: ShortlistStorage> {
    client: ApiClient,
    candidates: Vec<Candidate>,
    pub filter: ViewFilter,
    pub form: CandidateForm,
    pub shortlist: ShortlistManager<S>,
    loading: bool,
    submitting: bool,
    success: Option<Notice>,
    error: Option<Notice>,
}

impl<S: ShortlistStorage> DashboardSession<S> {
    pub fn new(client: ApiClient, shortlist: ShortlistManager<S>) -> Self {
        Self {
            client,
            candidates: Vec::new(),
            filter: ViewFilter::default(),
            form: CandidateForm::default(),
            shortlist,
            loading: false,
            submitting: false,
            success: None,
            error: None,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn find(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn success(&self) -> Option<&Notice> {
        self.success.as_ref()
    }

    pub fn error(&self) -> Option<&Notice> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Drops a success notice whose display time has passed.
    pub fn clear_expired(&mut self, now: Instant) {
        if matches!(&self.success, Some(Notice { expires_at: Some(t), .. }) if *t <= now) {
            self.success = None;
        }
    }

    pub fn view(&self) -> Vec<Candidate> {
        derive_view(&self.candidates, &self.filter)
    }

    pub fn top_candidates(&self) -> Vec<Candidate> {
        top_candidates(&self.view()).to_vec()
    }

    /// Fetches the full list. On failure the previous snapshot is kept.
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.client.list_candidates().await {
            Ok(candidates) => {
                info!("Loaded {} candidates", candidates.len());
                self.candidates = candidates;
            }
            Err(e) => {
                error!("Failed to fetch submissions: {e}");
                self.set_error("Failed to load candidates. Is the backend running?");
            }
        }
        self.loading = false;
    }

    /// Submits the form. Returns the stored candidate on success.
    pub async fn submit(&mut self, now: Instant) -> Option<Candidate> {
        self.submitting = true;
        self.error = None;

        let payload = self.form.to_payload();
        if payload.name.as_deref().map_or(true, str::is_empty) {
            self.set_error("Name is required");
            self.submitting = false;
            return None;
        }

        let result = self.client.create_candidate(&payload).await;
        self.submitting = false;
        match result {
            Ok(candidate) => {
                self.candidates.push(candidate.clone());
                self.form = CandidateForm::default();
                self.success = Some(Notice {
                    kind: NoticeKind::Success,
                    text: "Candidate added successfully".to_string(),
                    expires_at: Some(now + SUCCESS_NOTICE_TTL),
                });
                Some(candidate)
            }
            Err(e) => {
                error!("Add candidate failed: {e}");
                self.set_error("Failed to add candidate — check backend logs or network tab.");
                None
            }
        }
    }

    /// Persists a server-side reason and merges the returned record.
    pub async fn save_server_reason(&mut self, id: &str, reason: &str) -> Option<Candidate> {
        match self.client.update_reason(id, reason).await {
            Ok(updated) => {
                if let Some(slot) = self.candidates.iter_mut().find(|c| c.id == updated.id) {
                    *slot = updated.clone();
                }
                Some(updated)
            }
            Err(e) => {
                error!("Update reason for {id} failed: {e}");
                self.set_error(format!("Failed to update reason: {e}"));
                None
            }
        }
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.error = Some(Notice {
            kind: NoticeKind::Error,
            text: text.into(),
            expires_at: None,
        });
    }
}
