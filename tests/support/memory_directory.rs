// ABOUTME: In-memory directory fake implementing RecordOps and ResourceOps.
// ABOUTME: Scriptable health and change-status schedules plus an ordered event log.

#![allow(dead_code)]

use async_trait::async_trait;
use metavasi::directory::{
    ChangeAction, ChangeBatch, ChangeHandle, ChangeStatus, HealthState, MemberHealth, RecordChange,
    RecordError, RecordOps, ResourceDescription, ResourceError, ResourceHandle, ResourceOps,
    ResourceSpec, WeightedRecord, Zone,
};
use metavasi::types::{ChangeId, InstanceId, RecordName};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One scripted answer to a health query: a set of observations or an
/// injected transport error.
pub type HealthPoll = Result<Vec<MemberHealth>, ()>;

/// One scripted answer to a change-status query.
pub type StatusPoll = Result<ChangeStatus, ()>;

/// Observable side effects in the order the directory saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ResourceCreated(String),
    MembersRegistered(String, usize),
    ResourceDeleted(String),
    ChangeSubmitted(usize),
    RecordDeleted(String),
}

struct Inner {
    zones: Vec<Zone>,
    records: Vec<WeightedRecord>,
    resources: HashMap<String, ResourceDescription>,
    health_scripts: HashMap<String, VecDeque<HealthPoll>>,
    health_queries: HashMap<String, u32>,
    submissions: Vec<Vec<RecordChange>>,
    reject_submissions_from: Option<usize>,
    submit_status: ChangeStatus,
    pending_status_scripts: VecDeque<VecDeque<StatusPoll>>,
    status_scripts: HashMap<String, VecDeque<StatusPoll>>,
    status_queries: u32,
    events: Vec<Event>,
    change_seq: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            zones: Vec::new(),
            records: Vec::new(),
            resources: HashMap::new(),
            health_scripts: HashMap::new(),
            health_queries: HashMap::new(),
            submissions: Vec::new(),
            reject_submissions_from: None,
            submit_status: ChangeStatus::InSync,
            pending_status_scripts: VecDeque::new(),
            status_scripts: HashMap::new(),
            status_queries: 0,
            events: Vec::new(),
            change_seq: 0,
        }
    }
}

/// In-memory directory. Submitted batches are applied to the record store
/// immediately so tests can assert on the resulting records, and every
/// mutation is appended to an event log for ordering assertions.
#[derive(Default)]
pub struct MemoryDirectory {
    inner: Mutex<Inner>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_zone(&self, zone: Zone) {
        self.inner.lock().unwrap().zones.push(zone);
    }

    pub fn add_record(&self, record: WeightedRecord) {
        self.inner.lock().unwrap().records.push(record);
    }

    pub fn add_resource(&self, description: ResourceDescription) {
        self.inner
            .lock()
            .unwrap()
            .resources
            .insert(description.name.clone(), description);
    }

    /// Script the answers to health queries for a resource. The last
    /// entry repeats once the schedule is exhausted.
    pub fn script_health(&self, resource: &str, polls: Vec<HealthPoll>) {
        self.inner
            .lock()
            .unwrap()
            .health_scripts
            .insert(resource.to_string(), polls.into());
    }

    /// Reject every submission starting at the given zero-based index.
    pub fn reject_submissions_from(&self, index: usize) {
        self.inner.lock().unwrap().reject_submissions_from = Some(index);
    }

    /// Make the next submitted change start as `Pending`, answering
    /// status queries from the given schedule. Once the schedule is
    /// exhausted further queries report `InSync`.
    pub fn submit_as_pending(&self, polls: Vec<StatusPoll>) {
        self.inner
            .lock()
            .unwrap()
            .pending_status_scripts
            .push_back(polls.into());
    }

    pub fn submissions(&self) -> Vec<Vec<RecordChange>> {
        self.inner.lock().unwrap().submissions.clone()
    }

    pub fn health_query_count(&self, resource: &str) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .health_queries
            .get(resource)
            .copied()
            .unwrap_or(0)
    }

    pub fn status_query_count(&self) -> u32 {
        self.inner.lock().unwrap().status_queries
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn record(&self, name: &RecordName, set_id: &str) -> Option<WeightedRecord> {
        self.inner
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.name == *name && r.set_id == set_id)
            .cloned()
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.inner.lock().unwrap().resources.contains_key(name)
    }

    pub fn resource(&self, name: &str) -> Option<ResourceDescription> {
        self.inner.lock().unwrap().resources.get(name).cloned()
    }
}

#[async_trait]
impl RecordOps for MemoryDirectory {
    async fn find_zone(&self, name: &RecordName) -> Result<Option<Zone>, RecordError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .zones
            .iter()
            .find(|z| z.name == *name)
            .cloned())
    }

    async fn find_record(
        &self,
        _zone: &Zone,
        name: &RecordName,
    ) -> Result<Option<WeightedRecord>, RecordError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.name == *name)
            .cloned())
    }

    async fn submit_change(
        &self,
        _zone: &Zone,
        batch: &ChangeBatch,
    ) -> Result<ChangeHandle, RecordError> {
        let mut inner = self.inner.lock().unwrap();
        let index = inner.submissions.len();

        if inner
            .reject_submissions_from
            .is_some_and(|from| index >= from)
        {
            return Err(RecordError::Transport("simulated rejection".to_string()));
        }

        let changes: Vec<RecordChange> = batch.iter().cloned().collect();
        for change in &changes {
            let position = inner
                .records
                .iter()
                .position(|r| r.name == change.record.name && r.set_id == change.record.set_id);
            match change.action {
                ChangeAction::Create => {
                    if position.is_some() {
                        return Err(RecordError::InvalidInput(format!(
                            "record {} already exists",
                            change.record.set_id
                        )));
                    }
                    inner.records.push(change.record.clone());
                }
                ChangeAction::Upsert => {
                    if let Some(i) = position {
                        inner.records[i] = change.record.clone();
                    } else {
                        inner.records.push(change.record.clone());
                    }
                }
                ChangeAction::Delete => {
                    if let Some(i) = position {
                        inner.records.remove(i);
                    }
                    let set_id = change.record.set_id.clone();
                    inner.events.push(Event::RecordDeleted(set_id));
                }
            }
        }

        inner.submissions.push(changes);
        inner.events.push(Event::ChangeSubmitted(index));

        let id = ChangeId::new(format!("change-{}", inner.change_seq));
        inner.change_seq += 1;

        let status = if let Some(script) = inner.pending_status_scripts.pop_front() {
            inner.status_scripts.insert(id.as_str().to_string(), script);
            ChangeStatus::Pending
        } else {
            inner.submit_status
        };

        Ok(ChangeHandle { id, status })
    }

    async fn change_status(&self, id: &ChangeId) -> Result<ChangeStatus, RecordError> {
        let mut inner = self.inner.lock().unwrap();
        inner.status_queries += 1;

        match inner
            .status_scripts
            .get_mut(id.as_str())
            .and_then(VecDeque::pop_front)
        {
            Some(Ok(status)) => Ok(status),
            Some(Err(())) => Err(RecordError::Transport(
                "simulated status failure".to_string(),
            )),
            None => Ok(ChangeStatus::InSync),
        }
    }

    async fn delete_record(
        &self,
        _zone: &Zone,
        record: &WeightedRecord,
    ) -> Result<(), RecordError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .records
            .retain(|r| !(r.name == record.name && r.set_id == record.set_id));
        inner.events.push(Event::RecordDeleted(record.set_id.clone()));
        Ok(())
    }
}

#[async_trait]
impl ResourceOps for MemoryDirectory {
    async fn describe(&self, name: &str) -> Result<Option<ResourceDescription>, ResourceError> {
        Ok(self.inner.lock().unwrap().resources.get(name).cloned())
    }

    async fn create(&self, spec: &ResourceSpec) -> Result<ResourceHandle, ResourceError> {
        let mut inner = self.inner.lock().unwrap();
        let dns_name = format!("{}-1234567890.us-west-2.elb.amazonaws.com", spec.name);
        let description = ResourceDescription {
            name: spec.name.clone(),
            dns_name: dns_name.clone(),
            vpc_id: None,
            subnets: spec.subnets.clone(),
            listeners: spec.listeners.clone(),
            members: Vec::new(),
            health_check: spec.health_check.clone(),
            tags: spec.tags.clone(),
        };
        inner.resources.insert(spec.name.clone(), description);
        inner.events.push(Event::ResourceCreated(spec.name.clone()));
        Ok(ResourceHandle {
            name: spec.name.clone(),
            dns_name,
        })
    }

    async fn register_members(
        &self,
        name: &str,
        members: &[InstanceId],
    ) -> Result<(), ResourceError> {
        let mut inner = self.inner.lock().unwrap();
        let count = members.len();
        match inner.resources.get_mut(name) {
            Some(description) => description.members = members.to_vec(),
            None => {
                return Err(ResourceError::Transport(format!(
                    "no such resource: {name}"
                )));
            }
        }
        inner
            .events
            .push(Event::MembersRegistered(name.to_string(), count));
        Ok(())
    }

    async fn member_health(&self, name: &str) -> Result<Vec<MemberHealth>, ResourceError> {
        let mut inner = self.inner.lock().unwrap();
        *inner.health_queries.entry(name.to_string()).or_insert(0) += 1;

        if let Some(script) = inner.health_scripts.get_mut(name) {
            let poll = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            };
            if let Some(poll) = poll {
                return poll
                    .map_err(|()| ResourceError::Transport("injected health failure".to_string()));
            }
        }

        match inner.resources.get(name) {
            Some(description) => Ok(description
                .members
                .iter()
                .map(|member| MemberHealth {
                    member: member.clone(),
                    state: HealthState::InService,
                })
                .collect()),
            None => Err(ResourceError::Transport(format!(
                "no such resource: {name}"
            ))),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), ResourceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.resources.remove(name);
        inner.events.push(Event::ResourceDeleted(name.to_string()));
        Ok(())
    }

    async fn find_by_dns_name(&self, dns_name: &str) -> Result<Option<String>, ResourceError> {
        let target = dns_name.strip_suffix('.').unwrap_or(dns_name);
        Ok(self
            .inner
            .lock()
            .unwrap()
            .resources
            .values()
            .find(|r| r.dns_name.eq_ignore_ascii_case(target))
            .map(|r| r.name.clone()))
    }
}
