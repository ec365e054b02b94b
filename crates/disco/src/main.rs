// # disco
//
// Registers the members of an autoscaling group in DNS so etcd nodes can
// find each other through SRV discovery.
//
// One invocation is one reconciliation:
//
// 1. Resolve the provider region (flag or instance metadata).
// 2. Resolve the group (flag or the instance's own membership tag).
// 3. List the group's members and collect one address per member.
// 4. Upsert the `_etcd-server[-ssl]._tcp.<domain>` SRV record.
// 5. Write the etcd environment file for the local node.
//
// The binary is a thin integration layer: configuration, logging setup and
// wiring only. All reconciliation logic lives in disco-core; all provider
// calls live in disco-aws.

use clap::Parser;
use disco_aws::{AutoscalingGroups, Ec2Instances, ImdsClient, Route53Dns};
use disco_core::config::{Config, DEFAULT_DOMAIN, DEFAULT_OUTPUT_FILE, DEFAULT_PORT, DEFAULT_TTL};
use disco_core::identity::IdentityResolver;
use disco_core::membership::GroupMembership;
use disco_core::pipeline::Pipeline;
use disco_core::syncer::{POLL_INTERVAL, RETRY_DELAY, RecordSyncer};
use disco_core::traits::MetadataApi;
use disco_core::types::{AddressKind, SyncOutcome};
use disco_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Clean run
/// - 1: Configuration error
/// - 2: Runtime error (provider or metadata failure)
#[derive(Debug, Clone, Copy)]
enum DiscoExitCode {
    Clean = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DiscoExitCode> for ExitCode {
    fn from(code: DiscoExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "disco",
    version,
    about = "Register autoscaling group members in DNS for etcd discovery"
)]
struct Cli {
    /// Hosted zone id the discovery record is managed in
    #[arg(long, env = "DISCO_ZONE")]
    zone: String,

    /// Domain the discovery record lives under
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    domain: String,

    /// Advertise TLS peers (publishes the -ssl record and https URLs)
    #[arg(long)]
    ssl: bool,

    /// Transport port advertised in each SRV value
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Record time-to-live in seconds
    #[arg(long, default_value_t = DEFAULT_TTL)]
    ttl: i64,

    /// Poll until the record change has propagated
    #[arg(long)]
    wait: bool,

    /// Give up waiting for propagation after this many seconds
    #[arg(long = "max-wait-secs")]
    max_wait_secs: Option<u64>,

    /// Provider region; read from instance metadata when omitted
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Autoscaling group name; discovered from instance tags when omitted
    #[arg(long)]
    group: Option<String>,

    /// Which address to publish per member: private-ip, public-ip,
    /// private-dns or public-dns
    #[arg(long = "value-type")]
    value_type: String,

    /// Where to write the etcd environment file
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    file: PathBuf,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return DiscoExitCode::ConfigError.into();
        }
    };

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!("Invalid log level: {}", other);
            return DiscoExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DiscoExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DiscoExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(cli).await {
            Ok(()) => DiscoExitCode::Clean,
            Err(e) if e.is_config() => {
                error!("Configuration error: {}", e);
                DiscoExitCode::ConfigError
            }
            Err(e) => {
                error!("Reconciliation failed: {}", e);
                DiscoExitCode::RuntimeError
            }
        }
    })
    .into()
}

async fn run(cli: Cli) -> Result<()> {
    let address_kind: AddressKind = cli.value_type.parse()?;
    let config = Config {
        zone_id: cli.zone,
        domain: cli.domain,
        ssl: cli.ssl,
        port: cli.port,
        ttl: cli.ttl,
        wait: cli.wait,
        max_wait_secs: cli.max_wait_secs,
        region: cli.region,
        group: cli.group,
        address_kind,
        file: cli.file,
    };
    config.validate()?;

    let imds = ImdsClient::new();
    let region = match &config.region {
        Some(region) => region.clone(),
        None => {
            info!("no region configured, reading from instance metadata");
            imds.region().await?
        }
    };
    info!(region = %region, "using provider region");

    let sdk = disco_aws::sdk_config(&region).await;
    let membership = GroupMembership::new(
        Box::new(AutoscalingGroups::new(&sdk)),
        Box::new(Ec2Instances::new(&sdk)),
    );
    let syncer = RecordSyncer::with_timing(
        Box::new(Route53Dns::new(&sdk, config.zone_id.as_str())),
        RETRY_DELAY,
        POLL_INTERVAL,
        config.max_wait(),
    );
    let identity = IdentityResolver::new(Box::new(imds), Box::new(Ec2Instances::new(&sdk)));
    let pipeline = Pipeline::new(Box::new(membership), Box::new(syncer), identity);

    let report = pipeline.run(&config).await?;
    match &report.outcome {
        SyncOutcome::Confirmed { change_id } => {
            info!(change_id = %change_id, peers = report.peers, "record change confirmed");
        }
        SyncOutcome::Submitted { change_id } => {
            info!(change_id = %change_id, peers = report.peers, "record change submitted");
        }
    }

    write_env_file(&config.file, &report.env_file)?;
    info!(file = %config.file.display(), "wrote etcd environment file");
    Ok(())
}

/// Write the rendered environment file, creating parent directories
fn write_env_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(Error::Io)?;
    }
    std::fs::write(path, content).map_err(Error::Io)?;
    Ok(())
}
