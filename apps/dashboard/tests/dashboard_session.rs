use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hiring_dashboard::dashboard::{
    ApiClient, CandidateForm, ClientError, DashboardSession, FileShortlistStorage, NoticeKind,
    ShortlistManager, SortMode,
};
use hiring_dashboard::models::candidate::{NewCandidate, WorkExperience};
use hiring_dashboard::routes::build_router;
use hiring_dashboard::state::AppState;
use hiring_dashboard::submissions::JsonFileStore;
use tempfile::{tempdir, TempDir};

async fn spawn_server(dir: &TempDir) -> SocketAddr {
    let store = JsonFileStore::new(dir.path().join("form-submissions.json"));
    let app = build_router(AppState {
        store: Arc::new(store),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn session(addr: SocketAddr, dir: &TempDir) -> DashboardSession<FileShortlistStorage> {
    let shortlist =
        ShortlistManager::load(FileShortlistStorage::new(dir.path().join("shortlist.json")));
    DashboardSession::new(ApiClient::new(format!("http://{addr}")), shortlist)
}

fn new_candidate(name: &str, roles: &[&str]) -> NewCandidate {
    NewCandidate {
        name: Some(name.to_string()),
        work_availability: vec!["full-time".to_string()],
        work_experiences: roles
            .iter()
            .map(|r| WorkExperience {
                role: r.to_string(),
                company: "Acme".to_string(),
            })
            .collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_client_create_list_and_update() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(&dir).await;
    let client = ApiClient::new(format!("http://{addr}/"));

    let created = client
        .create_candidate(&new_candidate("Ada Lovelace", &["Engineer"]))
        .await
        .unwrap();
    assert_eq!(created.name, "Ada Lovelace");
    assert_eq!(created.reason, "");

    let listed = client.list_candidates().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let updated = client.update_reason(&created.id, "Strong fit").await.unwrap();
    assert_eq!(updated.reason, "Strong fit");
}

#[tokio::test]
async fn test_client_surfaces_server_errors() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(&dir).await;
    let client = ApiClient::new(format!("http://{addr}"));

    match client.update_reason("unknown", "x").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Candidate not found");
        }
        other => panic!("expected 404, got {other:?}"),
    }

    let err = client
        .create_candidate(&NewCandidate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status.as_u16() == 400));
}

#[tokio::test]
async fn test_client_sends_reserved_characters_in_id_as_one_segment() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(&dir).await;
    let client = ApiClient::new(format!("http://{addr}"));

    match client.update_reason("a/b?c#d", "x").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Candidate not found");
        }
        other => panic!("expected 404 from the update route, got {other:?}"),
    }
}

#[tokio::test]
async fn test_session_refresh_submit_and_view() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(&dir).await;
    let client = ApiClient::new(format!("http://{addr}"));
    client
        .create_candidate(&new_candidate("Grace Hopper", &["Admiral"]))
        .await
        .unwrap();

    let mut session = session(addr, &dir);
    session.refresh().await;
    assert!(!session.is_loading());
    assert_eq!(session.candidates().len(), 1);

    session.form.name = "  Barbara Liskov ".to_string();
    session
        .form
        .update_experience(0, Some("Professor"), Some("MIT"));
    session.form.add_experience_row();
    session
        .form
        .update_experience(1, Some("Researcher"), Some("Mitre"));
    let now = Instant::now();
    let stored = session.submit(now).await.unwrap();

    assert!(!session.is_submitting());
    assert_eq!(stored.name, "Barbara Liskov");
    assert_eq!(session.candidates().len(), 2);
    assert_eq!(session.form, CandidateForm::default());
    let notice = session.success().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "Candidate added successfully");

    session.clear_expired(now + Duration::from_secs(1));
    assert!(session.success().is_some());
    session.clear_expired(now + Duration::from_secs(3));
    assert!(session.success().is_none());

    session.filter.sort = SortMode::Experience;
    let names: Vec<String> = session.view().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Barbara Liskov", "Grace Hopper"]);
    assert_eq!(session.top_candidates().len(), 2);
}

#[tokio::test]
async fn test_session_rejects_blank_name_without_request() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(&dir).await;
    let mut session = session(addr, &dir);

    session.form.name = "   ".to_string();
    assert!(session.submit(Instant::now()).await.is_none());
    assert_eq!(session.error().unwrap().text, "Name is required");
    assert!(!session.is_submitting());

    let listed = ApiClient::new(format!("http://{addr}"))
        .list_candidates()
        .await
        .unwrap();
    assert!(listed.is_empty());

    session.dismiss_error();
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_session_save_server_reason_merges_snapshot() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(&dir).await;
    let mut session = session(addr, &dir);
    session.form.name = "Linus".to_string();
    let stored = session.submit(Instant::now()).await.unwrap();

    let updated = session
        .save_server_reason(&stored.id, "Kernel maintainer")
        .await
        .unwrap();
    assert_eq!(updated.reason, "Kernel maintainer");
    assert_eq!(session.find(&stored.id).unwrap().reason, "Kernel maintainer");

    assert!(session.save_server_reason("nope", "x").await.is_none());
    assert!(session.error().is_some());
}

#[tokio::test]
async fn test_session_refresh_failure_keeps_snapshot() {
    let dir = tempdir().unwrap();
    // Reserve a port, then close it so nothing is listening.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let mut session = session(addr, &dir);

    session.refresh().await;
    assert!(!session.is_loading());
    assert!(session.candidates().is_empty());
    assert_eq!(
        session.error().unwrap().text,
        "Failed to load candidates. Is the backend running?"
    );
}

#[tokio::test]
async fn test_shortlist_is_not_written_to_server() {
    let dir = tempdir().unwrap();
    let addr = spawn_server(&dir).await;
    let mut session = session(addr, &dir);
    session.form.name = "Ada".to_string();
    session.submit(Instant::now()).await.unwrap();
    session.refresh().await;

    let candidate = session.candidates()[0].clone();
    session.shortlist.toggle(&candidate).unwrap();
    session.shortlist.set_reason(&candidate.id, "local only").unwrap();

    session.refresh().await;
    assert_eq!(session.candidates()[0].reason, "");
    assert_eq!(
        session.shortlist.get(&candidate.id).unwrap().reason(),
        "local only"
    );
}
