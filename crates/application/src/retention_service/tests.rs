use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use tokio::sync::Mutex;

use pharmadesk_core::{AppError, AppResult, TenantId};
use pharmadesk_domain::{AuditLogRecord, AuditLogRecordInput, RetentionYears};

use crate::retention_ports::{AuditLogPredicate, AuditLogStore, Clock};

use super::{RetentionConfig, RetentionSweeper, ScheduledArchivalOutcome};

#[derive(Default)]
struct FakeAuditLogStore {
    records: Mutex<Vec<AuditLogRecord>>,
    fail_archive: bool,
    fail_count: bool,
    fail_delete: bool,
}

impl FakeAuditLogStore {
    fn with_records(records: Vec<AuditLogRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }
}

#[async_trait]
impl AuditLogStore for FakeAuditLogStore {
    async fn count_where(&self, predicate: AuditLogPredicate) -> AppResult<u64> {
        if self.fail_count {
            return Err(AppError::Internal("count unavailable".to_owned()));
        }

        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|record| predicate.matches(record))
            .count() as u64)
    }

    async fn archive_where(
        &self,
        predicate: AuditLogPredicate,
        archived_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        if self.fail_archive {
            return Err(AppError::Internal("archive unavailable".to_owned()));
        }

        let mut records = self.records.lock().await;
        let mut archived = 0;
        for record in records.iter_mut().filter(|record| predicate.matches(record)) {
            if record.archive(archived_at).is_ok() {
                archived += 1;
            }
        }

        Ok(archived)
    }

    async fn delete_where(&self, predicate: AuditLogPredicate) -> AppResult<u64> {
        if self.fail_delete {
            return Err(AppError::Internal("delete unavailable".to_owned()));
        }

        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| !predicate.matches(record));
        Ok((before - records.len()) as u64)
    }
}

struct FixedClock(DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

fn now_utc() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).single() {
        Some(value) => value,
        None => panic!("valid fixed clock timestamp"),
    }
}

fn years(value: u16) -> RetentionYears {
    match RetentionYears::new(value) {
        Ok(years) => years,
        Err(error) => panic!("invalid test years: {error}"),
    }
}

fn days_ago(days: i64) -> DateTime<Utc> {
    now_utc() - TimeDelta::days(days)
}

fn record(
    resource_id: &str,
    created_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
) -> AuditLogRecord {
    let mut record = match AuditLogRecord::new(AuditLogRecordInput {
        tenant_id: TenantId::random(),
        subject: "pharmacist".to_owned(),
        action: "catalog.product.updated".to_owned(),
        resource_type: "product".to_owned(),
        resource_id: resource_id.to_owned(),
        detail: None,
        created_at,
    }) {
        Ok(record) => record,
        Err(error) => panic!("invalid test record: {error}"),
    };

    if let Some(archived_at) = archived_at {
        assert!(record.archive(archived_at).is_ok());
    }

    record
}

fn sweeper(store: Arc<FakeAuditLogStore>) -> RetentionSweeper {
    sweeper_at(store, now_utc().with_timezone(&Local))
}

fn sweeper_at(store: Arc<FakeAuditLogStore>, now: DateTime<Local>) -> RetentionSweeper {
    RetentionSweeper::new(store, Arc::new(FixedClock(now)), RetentionConfig::default())
}

fn local_noon(year: i32, month: u32, day: u32) -> DateTime<Local> {
    match Local.with_ymd_and_hms(year, month, day, 12, 0, 0).single() {
        Some(value) => value,
        None => panic!("noon should exist in the local zone"),
    }
}

async fn archived_ids(store: &FakeAuditLogStore) -> Vec<String> {
    store
        .records
        .lock()
        .await
        .iter()
        .filter(|record| record.archived_at().is_some())
        .map(|record| record.resource_id().to_owned())
        .collect()
}

async fn stored_ids(store: &FakeAuditLogStore) -> Vec<String> {
    store
        .records
        .lock()
        .await
        .iter()
        .map(|record| record.resource_id().to_owned())
        .collect()
}

#[tokio::test]
async fn scheduled_archival_archives_only_records_past_retention() {
    let store = Arc::new(FakeAuditLogStore::with_records(vec![
        record("eight-years", days_ago(8 * 365), None),
        record("five-years", days_ago(5 * 365), None),
    ]));
    let sweeper = sweeper(store.clone());

    let outcome = sweeper.run_scheduled_archival().await;

    let ScheduledArchivalOutcome::Completed { report, statistics } = outcome else {
        panic!("scheduled archival should complete");
    };
    assert_eq!(report.archived_count, 1);
    assert_eq!(report.retention_years.get(), 7);
    assert_eq!(report.archived_at, now_utc());
    assert!(matches!(
        statistics,
        Ok(stats) if stats.active_count == 1 && stats.archived_count == 1 && stats.total_count == 2
    ));
    assert_eq!(archived_ids(&store).await, vec!["eight-years".to_owned()]);
}

#[tokio::test]
async fn scheduled_archival_is_idempotent() {
    let store = Arc::new(FakeAuditLogStore::with_records(vec![
        record("old-a", days_ago(9 * 365), None),
        record("old-b", days_ago(10 * 365), None),
    ]));
    let sweeper = sweeper(store.clone());

    let first = sweeper.run_scheduled_archival().await;
    let second = sweeper.run_scheduled_archival().await;

    assert_eq!(first.archived_count(), 2);
    assert_eq!(second.archived_count(), 0);
    assert!(!second.is_failed());
}

#[tokio::test]
async fn scheduled_archival_keeps_existing_archive_timestamp() {
    let earlier = days_ago(400);
    let store = Arc::new(FakeAuditLogStore::with_records(vec![record(
        "already-archived",
        days_ago(12 * 365),
        Some(earlier),
    )]));
    let sweeper = sweeper(store.clone());

    let outcome = sweeper.run_scheduled_archival().await;

    assert_eq!(outcome.archived_count(), 0);
    let records = store.records.lock().await;
    assert_eq!(records[0].archived_at(), Some(earlier));
}

#[tokio::test]
async fn scheduled_archival_captures_store_failure() {
    let store = Arc::new(FakeAuditLogStore {
        records: Mutex::new(vec![record("old", days_ago(8 * 365), None)]),
        fail_archive: true,
        ..FakeAuditLogStore::default()
    });
    let sweeper = sweeper(store.clone());

    let outcome = sweeper.run_scheduled_archival().await;

    assert!(outcome.is_failed());
    assert!(matches!(
        outcome,
        ScheduledArchivalOutcome::Failed { error: AppError::Internal(_), .. }
    ));
    assert!(archived_ids(&store).await.is_empty());
}

#[tokio::test]
async fn statistics_failure_is_reported_apart_from_archival() {
    let store = Arc::new(FakeAuditLogStore {
        records: Mutex::new(vec![record("old", days_ago(8 * 365), None)]),
        fail_count: true,
        ..FakeAuditLogStore::default()
    });
    let sweeper = sweeper(store.clone());

    let outcome = sweeper.run_scheduled_archival().await;

    let ScheduledArchivalOutcome::Completed { report, statistics } = outcome else {
        panic!("archival should complete even when statistics fail");
    };
    assert_eq!(report.archived_count, 1);
    assert!(statistics.is_err());
}

#[tokio::test]
async fn manual_archival_propagates_store_failure() {
    let store = Arc::new(FakeAuditLogStore {
        fail_archive: true,
        ..FakeAuditLogStore::default()
    });
    let sweeper = sweeper(store);

    let result = sweeper.run_manual_archival(None).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn manual_archival_override_does_not_change_configured_default() {
    let store = Arc::new(FakeAuditLogStore::with_records(vec![
        record("five-years", days_ago(5 * 365), None),
        record("one-year", days_ago(365 - 30), None),
    ]));
    let sweeper = sweeper(store.clone());

    let result = sweeper.run_manual_archival(Some(years(3))).await;

    assert!(matches!(
        result,
        Ok(report) if report.archived_count == 1 && report.retention_years.get() == 3
    ));
    assert_eq!(archived_ids(&store).await, vec!["five-years".to_owned()]);
    assert_eq!(sweeper.config().retention_years.get(), 7);
}

#[tokio::test]
async fn manual_archival_uses_configured_years_without_override() {
    let store = Arc::new(FakeAuditLogStore::with_records(vec![record(
        "five-years",
        days_ago(5 * 365),
        None,
    )]));
    let sweeper = sweeper(store.clone());

    let result = sweeper.run_manual_archival(None).await;

    assert!(matches!(result, Ok(report) if report.archived_count == 0));
}

#[tokio::test]
async fn purge_removes_only_records_archived_past_grace_period() {
    let store = Arc::new(FakeAuditLogStore::with_records(vec![
        record("archived-two-years", days_ago(10 * 365), Some(days_ago(2 * 365))),
        record("archived-six-months", days_ago(9 * 365), Some(days_ago(182))),
        record("active-ancient", days_ago(20 * 365), None),
    ]));
    let sweeper = sweeper(store.clone());

    let result = sweeper.purge_archived_records(None).await;

    assert!(matches!(
        result,
        Ok(report) if report.deleted_count == 1 && report.grace_years.get() == 1
    ));
    assert_eq!(
        stored_ids(&store).await,
        vec!["archived-six-months".to_owned(), "active-ancient".to_owned()]
    );
}

#[tokio::test]
async fn purge_honours_explicit_grace_years() {
    let store = Arc::new(FakeAuditLogStore::with_records(vec![
        record("archived-two-years", days_ago(10 * 365), Some(days_ago(2 * 365))),
        record("archived-four-years", days_ago(12 * 365), Some(days_ago(4 * 365))),
    ]));
    let sweeper = sweeper(store.clone());

    let result = sweeper.purge_archived_records(Some(years(3))).await;

    assert!(matches!(result, Ok(report) if report.deleted_count == 1));
    assert_eq!(stored_ids(&store).await, vec!["archived-two-years".to_owned()]);
}

#[tokio::test]
async fn purge_propagates_store_failure() {
    let store = Arc::new(FakeAuditLogStore {
        fail_delete: true,
        ..FakeAuditLogStore::default()
    });
    let sweeper = sweeper(store);

    let result = sweeper.purge_archived_records(None).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn scheduled_archival_never_purges() {
    let store = Arc::new(FakeAuditLogStore::with_records(vec![record(
        "archived-long-ago",
        days_ago(15 * 365),
        Some(days_ago(5 * 365)),
    )]));
    let sweeper = sweeper(store.clone());

    let _ = sweeper.run_scheduled_archival().await;

    assert_eq!(stored_ids(&store).await, vec!["archived-long-ago".to_owned()]);
}

#[test]
fn config_from_raw_falls_back_to_defaults() {
    let config = RetentionConfig::from_raw(None, Some("  "));
    assert!(matches!(config, Ok(config) if config == RetentionConfig::default()));
}

#[test]
fn config_from_raw_parses_values() {
    let config = RetentionConfig::from_raw(Some("10"), Some("2"));
    assert!(matches!(
        config,
        Ok(config) if config.retention_years.get() == 10 && config.archive_grace_years.get() == 2
    ));
}

#[test]
fn config_from_raw_rejects_non_numeric_years() {
    let config = RetentionConfig::from_raw(Some("seven"), None);
    assert!(matches!(
        config,
        Err(AppError::Validation(message)) if message.contains("AUDIT_RETENTION_YEARS")
    ));
}

#[test]
fn config_from_raw_rejects_zero_years() {
    let config = RetentionConfig::from_raw(None, Some("0"));
    assert!(matches!(config, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn record_created_exactly_at_cutoff_stays_active() {
    let cutoff = local_noon(2019, 10, 17).with_timezone(&Utc);
    let store = Arc::new(FakeAuditLogStore::with_records(vec![
        record("at-cutoff", cutoff, None),
        record("just-before-cutoff", cutoff - TimeDelta::seconds(1), None),
    ]));
    let sweeper = sweeper_at(store.clone(), local_noon(2026, 10, 17));

    let outcome = sweeper.run_scheduled_archival().await;

    let ScheduledArchivalOutcome::Completed { report, .. } = outcome else {
        panic!("scheduled archival should complete");
    };
    assert_eq!(report.cutoff, cutoff);
    assert_eq!(report.archived_count, 1);
    assert_eq!(archived_ids(&store).await, vec!["just-before-cutoff".to_owned()]);
}

#[tokio::test]
async fn leap_day_clock_archives_up_to_the_first_of_march() {
    let cutoff = local_noon(2017, 3, 1).with_timezone(&Utc);
    let store = Arc::new(FakeAuditLogStore::with_records(vec![
        record("february", local_noon(2017, 2, 28).with_timezone(&Utc), None),
        record("march-morning", cutoff - TimeDelta::hours(1), None),
        record("march-noon", cutoff, None),
        record("march-evening", cutoff + TimeDelta::hours(6), None),
    ]));
    let sweeper = sweeper_at(store.clone(), local_noon(2024, 2, 29));

    let outcome = sweeper.run_scheduled_archival().await;

    let ScheduledArchivalOutcome::Completed { report, statistics } = outcome else {
        panic!("scheduled archival should complete");
    };
    assert_eq!(report.cutoff, cutoff);
    assert_eq!(report.archived_count, 2);
    assert!(matches!(
        statistics,
        Ok(stats) if stats.active_count == 2 && stats.archived_count == 2
    ));
    assert_eq!(
        archived_ids(&store).await,
        vec!["february".to_owned(), "march-morning".to_owned()]
    );
}
