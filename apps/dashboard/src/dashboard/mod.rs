// Dashboard client: view derivation over a fetched snapshot, the capped
// shortlist with its own local storage, exports, and the HTTP client.

pub mod client;
pub mod export;
pub mod session;
pub mod shortlist;
pub mod suggest;
pub mod view;

pub use client::{ApiClient, ClientError};
pub use session::{CandidateForm, DashboardSession, Notice, NoticeKind};
pub use shortlist::{
    FileShortlistStorage, ShortlistEntry, ShortlistError, ShortlistManager, ShortlistStorage,
    Toggled, SHORTLIST_CAPACITY,
};
pub use view::{derive_view, top_candidates, SortMode, ViewFilter};
