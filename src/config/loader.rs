use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级从低到高：
    /// 1. 开发环境默认值
    /// 2. ./config.toml
    /// 3. 环境变量（HERON_ 前缀，双下划线分隔嵌套键，
    ///    如 HERON_UPSTREAM__BASE_URL）
    ///
    /// `QUERY_API_BASE` 单独覆盖上游服务基础地址。
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(PathBuf::from("config.toml"))
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("HERON_").split("__"));

        let mut config: AppConfig = figment.extract()?;

        if let Ok(base) = std::env::var("QUERY_API_BASE") {
            config.upstream.base_url = base;
        }

        Ok(config)
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.upstream.base_url.is_empty() {
            return Err(ConfigValidationError::MissingUpstreamUrl);
        }

        if !config.upstream.base_url.starts_with("http://")
            && !config.upstream.base_url.starts_with("https://")
        {
            return Err(ConfigValidationError::InvalidUpstreamUrl(
                config.upstream.base_url.clone(),
            ));
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("上游服务基础地址未配置")]
    MissingUpstreamUrl,

    #[error("上游服务基础地址无效: {0}")]
    InvalidUpstreamUrl(String),
}
