use thaw_core::model::{Job, JobAction, JobStatus};
use thaw_core::testing::MemoryVault;
use thaw_core::{
    JobQuery, JobReconciler, RemoteError, RemoteErrorKind, ThawError,
    collect_jobs,
};

fn retrieval(job: &str, archive: &str, status: JobStatus) -> Job {
    Job::retrieval(job.into(), archive.into(), status)
}

fn seeded_vault() -> MemoryVault {
    let vault = MemoryVault::new();
    vault.push_job(retrieval("J-ok", "A1", JobStatus::Succeeded));
    vault.push_job(retrieval("J-fail", "A2", JobStatus::Failed));
    vault.push_job(retrieval("J-run", "A3", JobStatus::InProgress));
    vault
}

#[tokio::test]
async fn classifies_jobs_and_indexes_live_ones() {
    let vault = seeded_vault();

    let snapshot = JobReconciler::new(usize::MAX)
        .fetch_jobs(&vault)
        .await
        .expect("reconcile ok");

    assert_eq!(snapshot.succeeded.len(), 1);
    assert_eq!(snapshot.failed.len(), 1);
    assert_eq!(snapshot.in_progress.len(), 1);

    assert!(snapshot.index.contains(&"A1".into()));
    assert!(snapshot.index.contains(&"A3".into()));
    assert!(
        !snapshot.index.contains(&"A2".into()),
        "failed jobs must not block a retry"
    );
}

#[tokio::test]
async fn failed_listing_errors_are_tolerated() {
    let vault = seeded_vault();
    vault.fail_listing(
        JobQuery::Failed,
        RemoteError::new(RemoteErrorKind::ServiceUnavailable, "down"),
    );

    let snapshot = JobReconciler::new(usize::MAX)
        .fetch_jobs(&vault)
        .await
        .expect("failed-jobs listing is informational");

    assert!(snapshot.failed.is_empty());
    assert_eq!(snapshot.succeeded.len(), 1);
    assert_eq!(snapshot.index.len(), 2);
}

#[tokio::test]
async fn succeeded_listing_errors_are_fatal() {
    let vault = seeded_vault();
    vault.fail_listing(
        JobQuery::Succeeded,
        RemoteError::new(RemoteErrorKind::ResourceNotFound, "no vault"),
    );

    let err = JobReconciler::new(usize::MAX)
        .fetch_jobs(&vault)
        .await
        .unwrap_err();

    match err {
        ThawError::JobListing { query, source } => {
            assert_eq!(query, JobQuery::Succeeded);
            assert_eq!(source.kind, RemoteErrorKind::ResourceNotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn in_progress_listing_errors_are_fatal() {
    let vault = seeded_vault();
    vault.fail_listing(
        JobQuery::InProgress,
        RemoteError::new(RemoteErrorKind::InvalidParameter, "bad filter"),
    );

    let err = JobReconciler::new(usize::MAX)
        .fetch_jobs(&vault)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ThawError::JobListing {
            query: JobQuery::InProgress,
            ..
        }
    ));
}

#[tokio::test]
async fn duplicate_jobs_keep_the_last_observed() {
    let vault = MemoryVault::new();
    vault.push_job(retrieval("J-old", "A1", JobStatus::InProgress));
    vault.push_job(retrieval("J-new", "A1", JobStatus::Succeeded));
    let mut inventory_job = Job::new(
        "J-inv".into(),
        JobAction::InventoryRetrieval,
        JobStatus::Succeeded,
    );
    inventory_job.archive_id = Some("A9".into());
    vault.push_job(inventory_job);

    let snapshot = JobReconciler::new(usize::MAX)
        .fetch_jobs(&vault)
        .await
        .unwrap();

    // In-progress jobs are indexed before succeeded ones.
    assert_eq!(snapshot.index.len(), 1);
    assert_eq!(
        snapshot.index.get(&"A1".into()).unwrap().job_id.as_str(),
        "J-new"
    );
    assert!(!snapshot.index.contains(&"A9".into()));
}

#[tokio::test]
async fn zero_cap_still_returns_the_first_page() {
    let vault = MemoryVault::new().with_page_size(5);
    for n in 0..12 {
        vault.push_job(retrieval(
            &format!("J{n}"),
            &format!("A{n}"),
            JobStatus::Succeeded,
        ));
    }

    let jobs = collect_jobs(&vault, JobQuery::Succeeded.filter(), 0)
        .await
        .unwrap();
    assert_eq!(jobs.len(), 5);
    assert_eq!(vault.pages_served(), 1);
}

#[tokio::test]
async fn cap_stops_after_the_page_that_crosses_it() {
    let vault = MemoryVault::new().with_page_size(5);
    for n in 0..12 {
        vault.push_job(retrieval(
            &format!("J{n}"),
            &format!("A{n}"),
            JobStatus::Succeeded,
        ));
    }

    let capped = collect_jobs(&vault, JobQuery::Succeeded.filter(), 6)
        .await
        .unwrap();
    assert_eq!(capped.len(), 10);

    let all = collect_jobs(&vault, JobQuery::Succeeded.filter(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(all.len(), 12);
    assert_eq!(all[11].job_id.as_str(), "J11");
}
