use log::{error, info};
use rusoto_core::{HttpClient, Region, RusotoError};
use rusoto_credential::ChainProvider;
use rusoto_ssm::{GetParameterError, GetParameterRequest, Ssm, SsmClient};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration parameter not found: {0}")]
    NotFound(String),
    #[error("configuration provider failure: {0}")]
    Provider(String),
}

/// Resolves named configuration values (bucket names, job definition ARNs,
/// version tags) at call time. No caching: each submission re-resolves every
/// key it needs, and a missing key fails the submission rather than falling
/// back to a default.
#[allow(async_fn_in_trait)]
pub trait ConfigProvider {
    async fn get(&self, name: &str) -> Result<String, ConfigError>;
}

/// Parameter Store implementation used in deployment
pub struct SsmConfig {
    client: SsmClient,
}

impl SsmConfig {
    pub fn new(region: Region) -> anyhow::Result<SsmConfig> {
        let client = SsmClient::new_with(HttpClient::new()?, ChainProvider::new(), region);
        Ok(SsmConfig { client })
    }
}

impl ConfigProvider for SsmConfig {
    async fn get(&self, name: &str) -> Result<String, ConfigError> {
        info!("Resolving SSM parameter {name}");
        let request = GetParameterRequest {
            name: name.to_string(),
            with_decryption: None,
        };
        let result = self.client.get_parameter(request).await.map_err(|err| {
            let err = match err {
                RusotoError::Service(GetParameterError::ParameterNotFound(_)) => {
                    ConfigError::NotFound(name.to_string())
                }
                other => ConfigError::Provider(other.to_string()),
            };
            error!("{err}");
            err
        })?;

        result
            .parameter
            .and_then(|parameter| parameter.value)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))
    }
}
