use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PricingSourceKind {
    #[default]
    Bundled,
    File,
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    #[serde(default)]
    pub source: PricingSourceKind,
    pub data_path: Option<String>,
    pub remote_url: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            source: PricingSourceKind::default(),
            data_path: None,
            remote_url: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    3600
}
fn default_sweep_interval() -> u64 {
    300
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CLOUDCOST").separator("__"))
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.pricing.check()?;
        app_config.cache.check()?;
        Ok(app_config)
    }
}

impl PricingConfig {
    fn check(&self) -> anyhow::Result<()> {
        match self.source {
            PricingSourceKind::File if self.data_path.is_none() => {
                anyhow::bail!("pricing.data_path is required when pricing.source = file")
            }
            PricingSourceKind::Remote if self.remote_url.is_none() => {
                anyhow::bail!("pricing.remote_url is required when pricing.source = remote")
            }
            _ => Ok(()),
        }
    }
}

impl CacheConfig {
    fn check(&self) -> anyhow::Result<()> {
        if self.sweep_interval_secs == 0 {
            anyhow::bail!("cache.sweep_interval_secs must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_default_when_absent() {
        let config = config::Config::builder()
            .set_default("server.host", "127.0.0.1")
            .unwrap()
            .set_default("server.port", 8080)
            .unwrap()
            .build()
            .unwrap();

        let app: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(app.server.port, 8080);
        assert_eq!(app.pricing.source, PricingSourceKind::Bundled);
        assert_eq!(app.cache.ttl_secs, 3600);
        assert_eq!(app.cache.sweep_interval_secs, 300);
    }

    #[test]
    fn test_remote_source_requires_url() {
        let pricing = PricingConfig {
            source: PricingSourceKind::Remote,
            ..Default::default()
        };
        assert!(pricing.check().is_err());
    }

    #[test]
    fn test_zero_sweep_interval_is_rejected() {
        let cache = CacheConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(cache.check().is_err());
        assert!(CacheConfig::default().check().is_ok());
    }
}
