// ABOUTME: Resource directory client boundary: traits, shared types, AWS adapter.
// ABOUTME: The cutover core only ever talks to the RecordOps/ResourceOps traits.

mod aws;
mod records;
mod resources;
mod types;

pub use aws::AwsDirectory;
pub use records::{RecordError, RecordOps};
pub use resources::{
    ResourceError, ResourceOps, backend_name_from_dns_value, resolve_backend_name,
};
pub use types::{
    ChangeAction, ChangeBatch, ChangeHandle, ChangeStatus, HealthCheckSpec, HealthState, Listener,
    MemberHealth, RecordChange, ResourceDescription, ResourceHandle, ResourceSpec, WeightedRecord,
    Zone,
};
