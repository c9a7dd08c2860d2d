//! Amazon Route 53 publisher.

use super::{Change, ChangeAction, ChangeBatch, PublishReceipt, Publisher};
use crate::error::{DynDnsError, Result};
use crate::PROG_NAME;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::BehaviorVersion;
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_sdk_route53::config::Region;
use aws_sdk_route53::error::{BuildError, DisplayErrorContext};
use aws_sdk_route53::types as r53;
use aws_sdk_route53::Client;
use std::path::PathBuf;
use tokio::sync::OnceCell;

/// Route 53 is global; requests are signed for this region when none is configured.
const FALLBACK_REGION: &str = "us-east-1";

/// Route 53 publisher using a shared credentials file profile.
///
/// The SDK client is built on first publish, so a run that has nothing to
/// publish never touches the credentials file.
pub struct Route53Publisher {
    profile: String,
    client: OnceCell<Client>,
}

impl Route53Publisher {
    /// Create a publisher using the `dyndns53` credentials profile.
    pub fn new() -> Self {
        Self::with_profile(PROG_NAME)
    }

    /// Create a publisher using a custom credentials profile.
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            client: OnceCell::new(),
        }
    }

    /// Create with a preconfigured client (for testing).
    pub fn with_client(client: Client) -> Self {
        Self {
            profile: PROG_NAME.to_string(),
            client: OnceCell::new_with(Some(client)),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Shared credentials file under the invoking user's home directory.
    pub fn credentials_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            DynDnsError::Credentials("could not determine home directory".to_string())
        })?;
        Ok(home.join(".aws").join("credentials"))
    }

    async fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Client> {
        let credentials_path = Self::credentials_path()?;
        tracing::debug!(
            "Loading profile {} from {}",
            self.profile,
            credentials_path.display()
        );

        let profile_files = EnvConfigFiles::builder()
            .with_file(EnvConfigFileKind::Credentials, credentials_path)
            .build();
        let credentials = ProfileFileCredentialsProvider::builder()
            .profile_files(profile_files)
            .profile_name(&self.profile)
            .build();
        let region = RegionProviderChain::default_provider().or_else(Region::new(FALLBACK_REGION));

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .load()
            .await;

        Ok(Client::new(&sdk_config))
    }
}

impl Default for Route53Publisher {
    fn default() -> Self {
        Self::new()
    }
}

fn build_error(e: BuildError) -> DynDnsError {
    DynDnsError::Provider(e.to_string())
}

/// Convert a batch entry into the SDK's change shape.
fn to_sdk_change(change: &Change) -> Result<r53::Change> {
    let action = match change.action {
        ChangeAction::Upsert => r53::ChangeAction::Upsert,
    };

    let record = r53::ResourceRecord::builder()
        .value(&change.value)
        .build()
        .map_err(build_error)?;

    let record_set = r53::ResourceRecordSet::builder()
        .name(&change.name)
        .r#type(r53::RrType::from(change.record_type.as_str()))
        .ttl(change.ttl)
        .resource_records(record)
        .build()
        .map_err(build_error)?;

    r53::Change::builder()
        .action(action)
        .resource_record_set(record_set)
        .build()
        .map_err(build_error)
}

#[async_trait]
impl Publisher for Route53Publisher {
    fn name(&self) -> &'static str {
        "route53"
    }

    async fn publish(&self, batch: &ChangeBatch) -> Result<PublishReceipt> {
        let client = self.client().await?;

        let changes = batch
            .changes()
            .iter()
            .map(to_sdk_change)
            .collect::<Result<Vec<_>>>()?;
        let change_batch = r53::ChangeBatch::builder()
            .set_changes(Some(changes))
            .build()
            .map_err(build_error)?;

        let output = client
            .change_resource_record_sets()
            .hosted_zone_id(batch.hosted_zone_id())
            .change_batch(change_batch)
            .send()
            .await
            .map_err(|e| DynDnsError::Provider(DisplayErrorContext(&e).to_string()))?;

        let info = output.change_info().ok_or_else(|| {
            DynDnsError::Provider("response is missing change info".to_string())
        })?;

        tracing::debug!(
            "Change {} for zone {} is {}",
            info.id(),
            batch.hosted_zone_id(),
            info.status().as_str()
        );

        Ok(PublishReceipt {
            change_id: info.id().to_string(),
            status: info.status().as_str().to_string(),
            timestamp: chrono::Utc::now(),
        })
    }
}
