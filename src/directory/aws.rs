// ABOUTME: AWS adapter for the directory traits: Route 53 + classic ELB.
// ABOUTME: Thin marshalling only; retry and state logic live in the cutover core.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_elasticloadbalancing as elb;
use aws_sdk_route53 as route53;
use route53::types::{
    Change, ChangeAction as AwsChangeAction, ChangeBatch as AwsChangeBatch,
    ChangeStatus as AwsChangeStatus, ResourceRecord, ResourceRecordSet, RrType,
};
use std::collections::HashMap;

use crate::types::{ChangeId, InstanceId, RecordName, ZoneId};

use super::records::{RecordError, RecordOps};
use super::resources::{ResourceError, ResourceOps};
use super::types::{
    ChangeAction, ChangeBatch, ChangeHandle, ChangeStatus, HealthCheckSpec, HealthState, Listener,
    MemberHealth, RecordChange, ResourceDescription, ResourceHandle, ResourceSpec, WeightedRecord,
    Zone,
};

/// Hard bound on lookup pagination. A zone page holds up to 100 records,
/// so this covers any zone we would plausibly run a cutover in while
/// keeping a stuck continuation token from looping forever.
const MAX_RECORD_PAGES: usize = 32;
const MAX_RESOURCE_PAGES: usize = 16;
const RECORD_PAGE_SIZE: i32 = 100;

/// Directory client backed by Route 53 and classic Elastic Load Balancing.
pub struct AwsDirectory {
    route53: route53::Client,
    elb: elb::Client,
}

impl AwsDirectory {
    /// Connect using the ambient AWS credential chain, pinned to a region.
    pub async fn connect(region: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            route53: route53::Client::new(&shared),
            elb: elb::Client::new(&shared),
        }
    }

    async fn tags_of(&self, name: &str) -> Result<HashMap<String, String>, ResourceError> {
        let out = self
            .elb
            .describe_tags()
            .load_balancer_names(name)
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        let mut tags = HashMap::new();
        for description in out.tag_descriptions() {
            for tag in description.tags() {
                tags.insert(
                    tag.key().to_string(),
                    tag.value().unwrap_or_default().to_string(),
                );
            }
        }
        Ok(tags)
    }
}

#[async_trait]
impl RecordOps for AwsDirectory {
    async fn find_zone(&self, name: &RecordName) -> Result<Option<Zone>, RecordError> {
        let out = self
            .route53
            .list_hosted_zones_by_name()
            .dns_name(name.as_str())
            .send()
            .await
            .map_err(|e| RecordError::Transport(e.to_string()))?;

        for zone in out.hosted_zones() {
            if zone.name() == name.as_str() {
                let id = zone.id().trim_start_matches("/hostedzone/").to_string();
                return Ok(Some(Zone {
                    id: ZoneId::new(id),
                    name: name.clone(),
                }));
            }
        }
        Ok(None)
    }

    async fn find_record(
        &self,
        zone: &Zone,
        name: &RecordName,
    ) -> Result<Option<WeightedRecord>, RecordError> {
        // Explicit pagination with a page bound; the listing starts at the
        // target name, so the record is almost always on the first page.
        let mut start_name = name.as_str().to_string();

        for _ in 0..MAX_RECORD_PAGES {
            let out = self
                .route53
                .list_resource_record_sets()
                .hosted_zone_id(zone.id.as_str())
                .start_record_name(&start_name)
                .start_record_type(RrType::Cname)
                .max_items(RECORD_PAGE_SIZE)
                .send()
                .await
                .map_err(|e| RecordError::Transport(e.to_string()))?;

            for set in out.resource_record_sets() {
                if set.name() == name.as_str() {
                    return weighted_record_from_set(set).map(Some);
                }
            }

            match out.next_record_name() {
                Some(next) => start_name = next.to_string(),
                None => return Ok(None),
            }
        }

        tracing::warn!(record = %name, pages = MAX_RECORD_PAGES, "record lookup page bound hit");
        Ok(None)
    }

    async fn submit_change(
        &self,
        zone: &Zone,
        batch: &ChangeBatch,
    ) -> Result<ChangeHandle, RecordError> {
        let mut changes = Vec::with_capacity(batch.len());
        for change in batch.iter() {
            changes.push(aws_change(change)?);
        }
        let change_batch = AwsChangeBatch::builder()
            .set_changes(Some(changes))
            .build()
            .map_err(|e| RecordError::InvalidInput(e.to_string()))?;

        let out = self
            .route53
            .change_resource_record_sets()
            .hosted_zone_id(zone.id.as_str())
            .change_batch(change_batch)
            .send()
            .await
            .map_err(|e| RecordError::Transport(e.to_string()))?;

        let info = out
            .change_info()
            .ok_or_else(|| RecordError::Transport("change info missing from response".into()))?;

        Ok(ChangeHandle {
            id: ChangeId::new(info.id().trim_start_matches("/change/").to_string()),
            status: change_status_from(info.status()),
        })
    }

    async fn change_status(&self, id: &ChangeId) -> Result<ChangeStatus, RecordError> {
        let out = self
            .route53
            .get_change()
            .id(id.as_str())
            .send()
            .await
            .map_err(|e| RecordError::Transport(e.to_string()))?;

        let info = out
            .change_info()
            .ok_or_else(|| RecordError::Transport("change info missing from response".into()))?;

        Ok(change_status_from(info.status()))
    }

    async fn delete_record(
        &self,
        zone: &Zone,
        record: &WeightedRecord,
    ) -> Result<(), RecordError> {
        let change = aws_change(&RecordChange::delete(record.clone()))?;
        let change_batch = AwsChangeBatch::builder()
            .changes(change)
            .build()
            .map_err(|e| RecordError::InvalidInput(e.to_string()))?;

        self.route53
            .change_resource_record_sets()
            .hosted_zone_id(zone.id.as_str())
            .change_batch(change_batch)
            .send()
            .await
            .map_err(|e| RecordError::Transport(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ResourceOps for AwsDirectory {
    async fn describe(&self, name: &str) -> Result<Option<ResourceDescription>, ResourceError> {
        let out = match self
            .elb
            .describe_load_balancers()
            .load_balancer_names(name)
            .send()
            .await
        {
            Ok(out) => out,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_access_point_not_found_exception() {
                    return Ok(None);
                }
                return Err(ResourceError::Transport(service_err.to_string()));
            }
        };

        let Some(lb) = out.load_balancer_descriptions().first() else {
            return Ok(None);
        };

        let tags = self.tags_of(name).await?;
        Ok(Some(resource_description_from(name, lb, tags)))
    }

    async fn create(&self, spec: &ResourceSpec) -> Result<ResourceHandle, ResourceError> {
        let mut listeners = Vec::with_capacity(spec.listeners.len());
        for listener in &spec.listeners {
            listeners.push(aws_listener(listener)?);
        }

        let mut tags = Vec::with_capacity(spec.tags.len());
        for (key, value) in &spec.tags {
            tags.push(
                elb::types::Tag::builder()
                    .key(key)
                    .value(value)
                    .build()
                    .map_err(|e| ResourceError::InvalidInput(e.to_string()))?,
            );
        }

        let mut request = self
            .elb
            .create_load_balancer()
            .load_balancer_name(&spec.name)
            .scheme(&spec.scheme)
            .set_listeners(Some(listeners))
            .set_subnets(Some(spec.subnets.clone()))
            .set_security_groups(Some(spec.security_groups.clone()));
        if !tags.is_empty() {
            request = request.set_tags(Some(tags));
        }

        let out = request
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;
        let dns_name = out.dns_name().unwrap_or_default().to_string();

        if let Some(hc) = &spec.health_check {
            let health_check = elb::types::HealthCheck::builder()
                .target(&hc.target)
                .interval(hc.interval)
                .timeout(hc.timeout)
                .healthy_threshold(hc.healthy_threshold)
                .unhealthy_threshold(hc.unhealthy_threshold)
                .build()
                .map_err(|e| ResourceError::InvalidInput(e.to_string()))?;

            self.elb
                .configure_health_check()
                .load_balancer_name(&spec.name)
                .health_check(health_check)
                .send()
                .await
                .map_err(|e| ResourceError::Transport(e.to_string()))?;
        }

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
        let instances: Vec<elb::types::Instance> = members
            .iter()
            .map(|member| {
                elb::types::Instance::builder()
                    .instance_id(member.as_str())
                    .build()
            })
            .collect();

        self.elb
            .register_instances_with_load_balancer()
            .load_balancer_name(name)
            .set_instances(Some(instances))
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        Ok(())
    }

    async fn member_health(&self, name: &str) -> Result<Vec<MemberHealth>, ResourceError> {
        let out = self
            .elb
            .describe_instance_health()
            .load_balancer_name(name)
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        Ok(out
            .instance_states()
            .iter()
            .map(|state| MemberHealth {
                member: InstanceId::new(state.instance_id().unwrap_or_default().to_string()),
                state: HealthState::from_state(state.state().unwrap_or_default()),
            })
            .collect())
    }

    async fn delete(&self, name: &str) -> Result<(), ResourceError> {
        self.elb
            .delete_load_balancer()
            .load_balancer_name(name)
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        Ok(())
    }

    async fn find_by_dns_name(&self, dns_name: &str) -> Result<Option<String>, ResourceError> {
        let target = dns_name.strip_suffix('.').unwrap_or(dns_name);
        let mut marker: Option<String> = None;

        for _ in 0..MAX_RESOURCE_PAGES {
            let mut request = self.elb.describe_load_balancers();
            if let Some(ref m) = marker {
                request = request.marker(m);
            }
            let out = request
                .send()
                .await
                .map_err(|e| ResourceError::Transport(e.to_string()))?;

            for lb in out.load_balancer_descriptions() {
                if lb
                    .dns_name()
                    .is_some_and(|d| d.eq_ignore_ascii_case(target))
                {
                    return Ok(lb.load_balancer_name().map(str::to_string));
                }
            }

            match out.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => return Ok(None),
            }
        }

        tracing::warn!(dns_name, pages = MAX_RESOURCE_PAGES, "resource lookup page bound hit");
        Ok(None)
    }
}

fn weighted_record_from_set(set: &ResourceRecordSet) -> Result<WeightedRecord, RecordError> {
    let name =
        RecordName::new(set.name()).map_err(|e| RecordError::InvalidInput(e.to_string()))?;
    let set_id = set
        .set_identifier()
        .ok_or_else(|| RecordError::NotWeighted(set.name().to_string()))?
        .to_string();
    let weight = set
        .weight()
        .ok_or_else(|| RecordError::NotWeighted(set.name().to_string()))?;
    let value = set
        .resource_records()
        .first()
        .map(|record| record.value().to_string())
        .ok_or_else(|| {
            RecordError::InvalidInput(format!("record {} has no value", set.name()))
        })?;

    Ok(WeightedRecord {
        name,
        set_id,
        weight,
        value,
        ttl: set.ttl().unwrap_or(60),
    })
}

fn aws_change(change: &RecordChange) -> Result<Change, RecordError> {
    let record = &change.record;
    let resource_record = ResourceRecord::builder()
        .value(record.value.clone())
        .build()
        .map_err(|e| RecordError::InvalidInput(e.to_string()))?;

    let record_set = ResourceRecordSet::builder()
        .name(record.name.as_str())
        .r#type(RrType::Cname)
        .set_identifier(record.set_id.clone())
        .weight(record.weight)
        .ttl(record.ttl)
        .resource_records(resource_record)
        .build()
        .map_err(|e| RecordError::InvalidInput(e.to_string()))?;

    Change::builder()
        .action(aws_action(change.action))
        .resource_record_set(record_set)
        .build()
        .map_err(|e| RecordError::InvalidInput(e.to_string()))
}

fn aws_listener(listener: &Listener) -> Result<elb::types::Listener, ResourceError> {
    let mut builder = elb::types::Listener::builder()
        .protocol(&listener.protocol)
        .load_balancer_port(listener.port)
        .instance_port(listener.member_port);
    if let Some(ref protocol) = listener.member_protocol {
        builder = builder.instance_protocol(protocol);
    }
    if let Some(ref certificate) = listener.certificate {
        builder = builder.ssl_certificate_id(certificate);
    }
    builder
        .build()
        .map_err(|e| ResourceError::InvalidInput(e.to_string()))
}

fn aws_action(action: ChangeAction) -> AwsChangeAction {
    match action {
        ChangeAction::Create => AwsChangeAction::Create,
        ChangeAction::Upsert => AwsChangeAction::Upsert,
        ChangeAction::Delete => AwsChangeAction::Delete,
    }
}

fn change_status_from(status: &AwsChangeStatus) -> ChangeStatus {
    match status {
        AwsChangeStatus::Insync => ChangeStatus::InSync,
        _ => ChangeStatus::Pending,
    }
}

fn resource_description_from(
    name: &str,
    lb: &elb::types::LoadBalancerDescription,
    tags: HashMap<String, String>,
) -> ResourceDescription {
    let listeners = lb
        .listener_descriptions()
        .iter()
        .filter_map(|description| description.listener())
        .map(|listener| Listener {
            protocol: listener.protocol().to_string(),
            port: listener.load_balancer_port(),
            member_protocol: listener.instance_protocol().map(str::to_string),
            member_port: listener.instance_port(),
            certificate: listener.ssl_certificate_id().map(str::to_string),
        })
        .collect();

    let members = lb
        .instances()
        .iter()
        .filter_map(|instance| instance.instance_id())
        .map(|id| InstanceId::new(id.to_string()))
        .collect();

    let health_check = lb.health_check().map(|hc| HealthCheckSpec {
        target: hc.target().to_string(),
        interval: hc.interval(),
        timeout: hc.timeout(),
        healthy_threshold: hc.healthy_threshold(),
        unhealthy_threshold: hc.unhealthy_threshold(),
    });

    ResourceDescription {
        name: lb.load_balancer_name().unwrap_or(name).to_string(),
        dns_name: lb.dns_name().unwrap_or_default().to_string(),
        vpc_id: lb.vpc_id().map(str::to_string),
        subnets: lb.subnets().to_vec(),
        listeners,
        members,
        health_check,
        tags,
    }
}
