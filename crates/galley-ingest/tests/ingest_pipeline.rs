//! End-to-end ingestion behavior against an in-memory store.

use galley_core::enums::{DataKind, JobState, Usage};
use galley_db::test_support::test_service_with_user;
use galley_ingest::{IngestError, IngestRequest, ingest};

const TEMPLATE: &str = "bwa mem {{reads.path}} > {{settings.name}}.sam";

fn doc_with_paths(reads: &str) -> String {
    format!(
        r#"{{
            "settings": {{
                "name": "align",
                "summary": "Read alignment",
                "help": "  Aligns reads against a reference."
            }},
            "reads": {{"path": "{reads}", "data_type": "fastq", "label": "input"}},
            "mode": {{"value": "fast"}}
        }}"#
    )
}

#[tokio::test]
async fn round_trip_stores_document_byte_for_byte() {
    let (svc, user) = test_service_with_user("alice").await;
    let project = svc
        .create_project("demo", &user.id, Usage::User)
        .await
        .unwrap();

    let spec_text = r#"{"settings": {"name": "X"}}"#;
    let outcome = ingest(
        &svc,
        IngestRequest {
            project: &project,
            spec_text,
            template: TEMPLATE,
            usage: Usage::User,
            create_job: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.analysis.name, "X");
    assert!(outcome.job.is_none());

    let stored = svc
        .find_analysis_by_name(&project.id, "X")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.spec_text, spec_text);
    assert_eq!(stored.template, TEMPLATE);
}

#[tokio::test]
async fn malformed_document_is_terminal() {
    let (svc, user) = test_service_with_user("alice").await;
    let project = svc
        .create_project("demo", &user.id, Usage::User)
        .await
        .unwrap();

    let err = ingest(
        &svc,
        IngestRequest {
            project: &project,
            spec_text: "{ nope",
            template: TEMPLATE,
            usage: Usage::User,
            create_job: true,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IngestError::Malformed(_)));
    assert!(svc.list_analyses(&project.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_job_binds_only_path_fields() {
    let (svc, user) = test_service_with_user("alice").await;
    let project = svc
        .create_project("demo", &user.id, Usage::User)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let reads = dir.path().join("reads.fq");
    std::fs::write(&reads, b"@r1\nACGT\n+\n!!!!\n").unwrap();

    let spec_text = doc_with_paths(&reads.to_string_lossy());
    let outcome = ingest(
        &svc,
        IngestRequest {
            project: &project,
            spec_text: &spec_text,
            template: TEMPLATE,
            usage: Usage::User,
            create_job: true,
        },
    )
    .await
    .unwrap();

    // One data entry for the path-bearing field; the pathless field is
    // silently skipped, not an error.
    assert_eq!(outcome.data.len(), 1);
    assert_eq!(outcome.data[0].name, "reads.fq");
    assert_eq!(outcome.data[0].kind, DataKind::Fastq);
    assert_eq!(outcome.data[0].metadata.as_ref().unwrap()["label"], "input");

    let job = outcome.job.unwrap();
    assert_eq!(job.state, JobState::Queued);
    assert_eq!(job.data_ids, vec![outcome.data[0].id.clone()]);
    assert_eq!(job.spec_text, spec_text);
}

#[tokio::test]
async fn unresolved_path_reports_partial_creation_and_no_job() {
    let (svc, user) = test_service_with_user("alice").await;
    let project = svc
        .create_project("demo", &user.id, Usage::User)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("a.fq");
    std::fs::write(&good, b"x").unwrap();

    // Fields walk in name order, so "first" resolves before "second" fails.
    let spec_text = format!(
        r#"{{
            "settings": {{"name": "align"}},
            "first": {{"path": "{}", "data_type": "fastq"}},
            "second": {{"path": "/no/such/file.fq", "data_type": "fastq"}}
        }}"#,
        good.to_string_lossy()
    );

    let err = ingest(
        &svc,
        IngestRequest {
            project: &project,
            spec_text: &spec_text,
            template: TEMPLATE,
            usage: Usage::User,
            create_job: true,
        },
    )
    .await
    .unwrap_err();

    match &err {
        IngestError::Unresolved { field, path, created } => {
            assert_eq!(field, "second");
            assert_eq!(path, "/no/such/file.fq");
            assert_eq!(created.len(), 1);
            assert_eq!(created[0].name, "a.fq");
        }
        other => panic!("expected Unresolved, got {other}"),
    }
    assert_eq!(err.created_so_far().len(), 1);

    // No job was created; the resolved entry is still reported and present.
    assert!(svc.list_jobs(&project.id).await.unwrap().is_empty());
    assert_eq!(svc.list_data(&project.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_analysis_name_fails_before_data_creation() {
    let (svc, user) = test_service_with_user("alice").await;
    let project = svc
        .create_project("demo", &user.id, Usage::User)
        .await
        .unwrap();

    let spec_text = r#"{"settings": {"name": "align"}}"#;
    let request = IngestRequest {
        project: &project,
        spec_text,
        template: TEMPLATE,
        usage: Usage::User,
        create_job: false,
    };
    ingest(&svc, request.clone()).await.unwrap();

    let err = ingest(&svc, request).await.unwrap_err();
    assert!(matches!(err, IngestError::Store(_)));
}
