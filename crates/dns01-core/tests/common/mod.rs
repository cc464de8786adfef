//! Test doubles and common utilities for solver contract tests
//!
//! [`FakeZoneApi`] keeps zones in memory and records every call so tests can
//! assert which provider operations a solver issued.

#![allow(dead_code)]

use dns01_core::error::{Error, Result};
use dns01_core::zone::{NewRecord, Record, RecordId, RecordType, Zone, ZoneId, ZoneSearchResult};
use dns01_core::{ChallengeSolver, Credentials, ZoneApi};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call observed by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FindZone { search: String },
    CreateRecord { zone_id: ZoneId, record: NewRecord },
    DeleteRecord { zone_id: ZoneId, record_id: RecordId },
}

#[derive(Default)]
struct FakeState {
    zones: Vec<Zone>,
    next_record_id: RecordId,
    calls: Vec<ApiCall>,
    api_keys_seen: Vec<String>,
    create_failure: Option<(u16, String)>,
    delete_failure: Option<(u16, String)>,
    find_failure: Option<String>,
    latency: Option<Duration>,
}

/// In-memory provider API
///
/// Creating a record identical in type, name and value to an existing one is
/// a no-op, mirroring the provider-side upsert.
#[derive(Clone, Default)]
pub struct FakeZoneApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeZoneApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.state.lock().unwrap().next_record_id = 1000;
        api
    }

    /// Add an empty zone
    pub fn with_zone(self, id: ZoneId, name: &str) -> Self {
        self.state.lock().unwrap().zones.push(Zone {
            id,
            name: name.to_string(),
            records: Vec::new(),
        });
        self
    }

    /// Add a record to an existing zone
    pub fn with_record(
        self,
        zone_id: ZoneId,
        record_id: RecordId,
        record_type: RecordType,
        name: &str,
        value: &str,
    ) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let zone = state
                .zones
                .iter_mut()
                .find(|z| z.id == zone_id)
                .expect("zone must be added before its records");
            zone.records.push(Record {
                id: record_id,
                record_type,
                ttl: 10,
                name: name.to_string(),
                value: value.to_string(),
                disabled: false,
            });
        }
        self
    }

    /// Make every create call fail with an HTTP status and body
    pub fn failing_create(self, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().create_failure = Some((status, body.to_string()));
        self
    }

    /// Make every delete call fail with an HTTP status and body
    pub fn failing_delete(self, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().delete_failure = Some((status, body.to_string()));
        self
    }

    /// Make every zone lookup fail at the transport level
    pub fn failing_find(self, message: &str) -> Self {
        self.state.lock().unwrap().find_failure = Some(message.to_string());
        self
    }

    /// Delay every call
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.lock().unwrap().latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn find_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::FindZone { search } => Some(search),
                _ => None,
            })
            .collect()
    }

    /// Number of create/delete calls
    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, ApiCall::FindZone { .. }))
            .count()
    }

    pub fn deleted_record_ids(&self) -> Vec<RecordId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::DeleteRecord { record_id, .. } => Some(record_id),
                _ => None,
            })
            .collect()
    }

    pub fn api_keys_seen(&self) -> Vec<String> {
        self.state.lock().unwrap().api_keys_seen.clone()
    }

    /// Current records of a zone
    pub fn records(&self, zone_id: ZoneId) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .map(|z| z.records.clone())
            .unwrap_or_default()
    }

    /// TXT records in a zone with the given name and value
    pub fn matching_txt(&self, zone_id: ZoneId, name: &str, value: &str) -> usize {
        self.records(zone_id)
            .iter()
            .filter(|r| r.matches_txt(name, value))
            .count()
    }

    async fn delay(&self) {
        let latency = self.state.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn observe(&self, credentials: &Credentials, call: ApiCall) {
        let mut state = self.state.lock().unwrap();
        state.api_keys_seen.push(credentials.api_key().to_string());
        state.calls.push(call);
    }
}

#[async_trait::async_trait]
impl ZoneApi for FakeZoneApi {
    async fn find_zone(&self, credentials: &Credentials, search: &str) -> Result<ZoneSearchResult> {
        self.observe(
            credentials,
            ApiCall::FindZone {
                search: search.to_string(),
            },
        );
        self.delay().await;

        let state = self.state.lock().unwrap();
        if let Some(message) = &state.find_failure {
            return Err(Error::transport(message.clone()));
        }

        let matches: Vec<Zone> = state
            .zones
            .iter()
            .filter(|z| z.name.contains(search))
            .cloned()
            .collect();

        Ok(ZoneSearchResult {
            total_items: matches.len() as u32,
            has_more_items: matches.len() > 1,
            current_page: 1,
            items: matches.into_iter().take(1).collect(),
        })
    }

    async fn create_record(
        &self,
        credentials: &Credentials,
        zone_id: ZoneId,
        record: &NewRecord,
    ) -> Result<()> {
        self.observe(
            credentials,
            ApiCall::CreateRecord {
                zone_id,
                record: record.clone(),
            },
        );
        self.delay().await;

        let mut state = self.state.lock().unwrap();
        if let Some((status, body)) = &state.create_failure {
            return Err(Error::provider(*status, body.clone()));
        }

        let id = state.next_record_id;
        state.next_record_id += 1;

        let zone = state
            .zones
            .iter_mut()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| Error::provider(404, "{\"Message\":\"zone not found\"}"))?;

        let exists = zone.records.iter().any(|r| {
            r.record_type == record.record_type && r.name == record.name && r.value == record.value
        });
        if !exists {
            zone.records.push(Record {
                id,
                record_type: record.record_type,
                ttl: record.ttl,
                name: record.name.clone(),
                value: record.value.clone(),
                disabled: record.disabled,
            });
        }
        Ok(())
    }

    async fn delete_record(
        &self,
        credentials: &Credentials,
        zone_id: ZoneId,
        record_id: RecordId,
    ) -> Result<()> {
        self.observe(credentials, ApiCall::DeleteRecord { zone_id, record_id });
        self.delay().await;

        let mut state = self.state.lock().unwrap();
        if let Some((status, body)) = &state.delete_failure {
            return Err(Error::provider(*status, body.clone()));
        }

        let zone = state
            .zones
            .iter_mut()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| Error::provider(404, "{\"Message\":\"zone not found\"}"))?;
        let before = zone.records.len();
        zone.records.retain(|r| r.id != record_id);
        if zone.records.len() == before {
            return Err(Error::provider(404, "{\"Message\":\"record not found\"}"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "bunny-net"
    }
}

pub const TEST_API_KEY: &str = "test-api-key";

/// Helper to build a solver over a fake API
pub fn solver_for(api: &FakeZoneApi) -> ChallengeSolver {
    ChallengeSolver::new(Box::new(api.clone()), Credentials::new(TEST_API_KEY))
}

/// The zone used by most tests
pub fn example_zone() -> FakeZoneApi {
    FakeZoneApi::new().with_zone(42, "example.com")
}
