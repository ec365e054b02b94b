// # AWS wire layer
//
// This crate implements disco-core's wire traits against AWS:
//
// - `ImdsClient`: instance metadata (IMDSv2) for self-identity
// - `AutoscalingGroups`: Auto Scaling group lookup
// - `Ec2Instances`: EC2 instance inventory
// - `Route53Dns`: Route 53 change submission and status polling
//
// Every implementation is single-shot: one trait call maps to one API
// round trip (plus pagination-free response mapping). Retries, backoff
// and confirmation polling are owned by disco-core.
//
// The mapping from SDK output types to disco-core domain types lives in
// small free functions next to each client so the translation is testable
// without a live endpoint.

pub mod autoscaling;
pub mod ec2;
pub mod imds;
pub mod route53;

pub use autoscaling::AutoscalingGroups;
pub use ec2::Ec2Instances;
pub use imds::ImdsClient;
pub use route53::Route53Dns;

/// Load the shared AWS SDK configuration for a region
pub async fn sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}
