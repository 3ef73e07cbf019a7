//! Gateway behavior against an in-memory store: every depth of MKD, the
//! deposit path, listings, and the visibility rules.

use std::sync::Arc;

use galley_core::enums::{DataKind, Usage};
use galley_db::service::GalleyService;
use galley_ftp::{Gateway, SessionContext};

async fn fixture() -> (Arc<GalleyService>, Gateway, SessionContext, tempfile::TempDir) {
    let svc = Arc::new(GalleyService::open(":memory:").await.unwrap());
    let user = svc.create_user("alice", false).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let gateway = Gateway::new(Arc::clone(&svc), dir.path());
    (svc, gateway, SessionContext::new(user), dir)
}

#[tokio::test]
async fn mkd_at_root_creates_project_and_session_sees_it() {
    let (svc, gateway, session, _dir) = fixture().await;

    let reply = gateway.mkd(&session, "/sequencing").await;
    assert_eq!(reply.code, 257);
    assert!(reply.text.contains("/sequencing"));

    // Visible to the creating session without any refresh step
    let names: Vec<String> = session
        .visible_projects(&svc)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["sequencing"]);

    // And in the root listing
    let listing = gateway.list(&session, "/").await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "sequencing");
    assert!(listing[0].is_dir);
}

#[tokio::test]
async fn mkd_duplicate_project_rejected_without_second_row() {
    let (svc, gateway, session, _dir) = fixture().await;
    assert_eq!(gateway.mkd(&session, "/demo").await.code, 257);

    let reply = gateway.mkd(&session, "/demo").await;
    assert_eq!(reply.code, 550);
    assert_eq!(reply.text, "Directory already exists.");
    assert_eq!(svc.list_projects().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn racing_mkd_from_many_sessions_has_one_winner() {
    let (svc, gateway, _session, _dir) = fixture().await;
    let gateway = Arc::new(gateway);

    let mut handles = Vec::new();
    for i in 0..6 {
        let svc = Arc::clone(&svc);
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(async move {
            let user = svc.create_user(&format!("user{i}"), false).await.unwrap();
            let session = SessionContext::new(user);
            gateway.mkd(&session, "/contested").await
        }));
    }

    let mut created = 0;
    let mut exists = 0;
    for handle in handles {
        let reply = handle.await.unwrap();
        match reply.code {
            257 => created += 1,
            550 => exists += 1,
            other => panic!("unexpected code {other}: {}", reply.text),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(exists, 5);
    assert_eq!(svc.list_projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn mkd_collection_level_is_navigational_only() {
    let (svc, gateway, session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;

    // Known tab exists structurally; nothing is created
    let reply = gateway.mkd(&session, "/demo/analyses").await;
    assert_eq!(reply.code, 550);
    assert!(svc
        .list_analyses(&svc.find_project_by_name("demo").await.unwrap().unwrap().id)
        .await
        .unwrap()
        .is_empty());

    // Missing project is a distinct not-found
    let reply = gateway.mkd(&session, "/ghost/analyses").await;
    assert_eq!(reply.code, 550);
    assert!(reply.text.contains("no such file or directory"));
}

#[tokio::test]
async fn mkd_depth_three_creates_entities_and_never_faults() {
    let (svc, gateway, session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;
    let project = svc.find_project_by_name("demo").await.unwrap().unwrap();

    // Analysis placeholder
    let reply = gateway.mkd(&session, "/demo/analyses/align").await;
    assert_eq!(reply.code, 257);
    assert!(svc
        .find_analysis_by_name(&project.id, "align")
        .await
        .unwrap()
        .is_some());

    // Duplicate uses the same scoped check as the root case
    let reply = gateway.mkd(&session, "/demo/analyses/align").await;
    assert_eq!(reply.code, 550);
    assert_eq!(reply.text, "Directory already exists.");

    // Data placeholder gets a real backing directory
    let reply = gateway.mkd(&session, "/demo/data/reads").await;
    assert_eq!(reply.code, 257);
    let entry = svc
        .find_data_by_name(&project.id, "reads")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.kind, DataKind::Directory);
    assert!(std::path::Path::new(&entry.path).is_dir());

    // Jobs are not directory-creatable
    let reply = gateway.mkd(&session, "/demo/jobs/j1").await;
    assert_eq!(reply.code, 550);

    // Unknown tab and junk names answer with a reply, not a fault
    assert_eq!(gateway.mkd(&session, "/demo/results/x").await.code, 550);
    assert_eq!(gateway.mkd(&session, "//").await.code, 550);
    assert_eq!(gateway.mkd(&session, "/demo/data/..").await.code, 550);
}

#[tokio::test]
async fn mkd_nested_acknowledged_only_under_existing_entity() {
    let (_svc, gateway, session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;
    gateway.mkd(&session, "/demo/data/reads").await;

    let reply = gateway.mkd(&session, "/demo/data/reads/run1").await;
    assert_eq!(reply.code, 257);

    let reply = gateway.mkd(&session, "/demo/data/ghost/run1").await;
    assert_eq!(reply.code, 550);
}

#[tokio::test]
async fn stor_creates_then_updates_in_place() {
    let (svc, gateway, session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;
    let project = svc.find_project_by_name("demo").await.unwrap().unwrap();

    let reply = gateway.stor(&session, "/demo/data/reads.fq", b"@r1\n").await;
    assert_eq!(reply.code, 226);
    assert!(reply.text.contains("created"));

    let entry = svc
        .find_data_by_name(&project.id, "reads.fq")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.kind, DataKind::Fastq);
    assert_eq!(std::fs::read(&entry.path).unwrap(), b"@r1\n");

    // Same name replaces content, never duplicates the record
    let reply = gateway.stor(&session, "/demo/data/reads.fq", b"@r2\n").await;
    assert_eq!(reply.code, 226);
    assert!(reply.text.contains("updated"));
    assert_eq!(svc.list_data(&project.id).await.unwrap().len(), 1);

    let entry = svc
        .find_data_by_name(&project.id, "reads.fq")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(std::fs::read(&entry.path).unwrap(), b"@r2\n");
}

#[tokio::test]
async fn stor_outside_data_tab_rejected() {
    let (_svc, gateway, session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;

    assert_eq!(gateway.stor(&session, "/demo/analyses/x", b"1").await.code, 550);
    assert_eq!(gateway.stor(&session, "/demo", b"1").await.code, 550);
    assert_eq!(gateway.stor(&session, "/ghost/data/x", b"1").await.code, 550);
}

#[tokio::test]
async fn listings_walk_the_tree() {
    let (_svc, gateway, session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;
    gateway.mkd(&session, "/demo/analyses/align").await;
    gateway.stor(&session, "/demo/data/reads.fq", b"x").await;

    let tabs: Vec<String> = gateway
        .list(&session, "/demo")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(tabs, ["analyses", "jobs", "data"]);

    let analyses = gateway.list(&session, "/demo/analyses").await.unwrap();
    assert_eq!(analyses[0].name, "align");

    let data = gateway.list(&session, "/demo/data").await.unwrap();
    assert_eq!(data[0].name, "reads.fq");
    assert!(!data[0].is_dir);

    let err = gateway.list(&session, "/ghost").await.unwrap_err();
    assert_eq!(err.code, 550);
}

#[tokio::test]
async fn listing_a_data_entry_shows_stored_files() {
    let (_svc, gateway, session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;
    gateway.mkd(&session, "/demo/data/reads").await;
    gateway.stor(&session, "/demo/data/reads/run2.fq", b"@r2\n").await;
    gateway.stor(&session, "/demo/data/reads/run1.fq", b"@r1\n").await;

    let files: Vec<String> = gateway
        .list(&session, "/demo/data/reads")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(files, ["run1.fq", "run2.fq"]);

    // A plain file entry lists as itself
    gateway.stor(&session, "/demo/data/sample.csv", b"a,b\n").await;
    let files = gateway.list(&session, "/demo/data/sample.csv").await.unwrap();
    assert_eq!(files.len(), 1);
    assert!(!files[0].is_dir);

    let err = gateway.list(&session, "/demo/data/ghost").await.unwrap_err();
    assert_eq!(err.code, 550);
}

#[tokio::test]
async fn hidden_projects_look_missing() {
    let (svc, gateway, alice_session, _dir) = fixture().await;
    let bob = svc.create_user("bob", false).await.unwrap();
    let bob_session = SessionContext::new(bob);
    gateway.mkd(&bob_session, "/private").await;
    svc.create_project(
        "open",
        &bob_session.current_user().id,
        Usage::Public,
    )
    .await
    .unwrap();

    // Root listing for alice: only the public project
    let names: Vec<String> = gateway
        .list(&alice_session, "/")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, ["open"]);

    // Addressing the hidden project is indistinguishable from a miss
    let reply = gateway.list(&alice_session, "/private").await.unwrap_err();
    assert!(reply.text.contains("no such file or directory"));
    let reply = gateway.mkd(&alice_session, "/private/analyses/x").await;
    assert!(reply.text.contains("no such file or directory"));
}

#[tokio::test]
async fn cwd_tracks_the_tree_and_relative_paths_resolve() {
    let (_svc, gateway, mut session, _dir) = fixture().await;
    gateway.mkd(&session, "/demo").await;

    assert_eq!(gateway.cwd(&mut session, "/demo/data").await.code, 250);
    assert_eq!(session.cwd(), "/demo/data");

    // Relative STOR lands under the cwd
    let reply = gateway.stor(&session, "sample.csv", b"a,b\n").await;
    assert_eq!(reply.code, 226);

    assert_eq!(gateway.cwd(&mut session, "/demo/nope").await.code, 550);
    assert_eq!(session.cwd(), "/demo/data", "failed CWD leaves cwd alone");
}
