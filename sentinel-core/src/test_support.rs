//! Repository doubles shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::flight::{FlightId, FlightRecord};
use crate::repository::{FlightRecordRepository, StoreResult, UpsertOutcome};

#[derive(Default)]
pub struct MapRepository {
    records: Mutex<HashMap<FlightId, FlightRecord>>,
}

#[async_trait]
impl FlightRecordRepository for MapRepository {
    async fn find_latest(&self, flight_id: &FlightId) -> StoreResult<Option<FlightRecord>> {
        Ok(self.records.lock().await.get(flight_id).cloned())
    }

    async fn upsert(&self, record: &FlightRecord) -> StoreResult<UpsertOutcome> {
        let mut records = self.records.lock().await;
        match records.get(record.flight_id()) {
            Some(current) if !record.supersedes(current) => Ok(UpsertOutcome::Superseded),
            _ => {
                records.insert(record.flight_id().clone(), record.clone());
                Ok(UpsertOutcome::Applied)
            }
        }
    }
}

pub struct CountingRepository<R> {
    inner: R,
    calls: AtomicUsize,
}

impl<R> CountingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: FlightRecordRepository> FlightRecordRepository for CountingRepository<R> {
    async fn find_latest(&self, flight_id: &FlightId) -> StoreResult<Option<FlightRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_latest(flight_id).await
    }

    async fn upsert(&self, record: &FlightRecord) -> StoreResult<UpsertOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(record).await
    }
}

pub struct FailingRepository;

#[async_trait]
impl FlightRecordRepository for FailingRepository {
    async fn find_latest(&self, _flight_id: &FlightId) -> StoreResult<Option<FlightRecord>> {
        Err("connection refused".into())
    }

    async fn upsert(&self, _record: &FlightRecord) -> StoreResult<UpsertOutcome> {
        Err("connection refused".into())
    }
}

pub struct HangingRepository;

#[async_trait]
impl FlightRecordRepository for HangingRepository {
    async fn find_latest(&self, _flight_id: &FlightId) -> StoreResult<Option<FlightRecord>> {
        std::future::pending().await
    }

    async fn upsert(&self, _record: &FlightRecord) -> StoreResult<UpsertOutcome> {
        std::future::pending().await
    }
}
