use crate::constants::{
    find_profile, GenerationProfile, DEFAULT_API_BASE, DEFAULT_PORT, DEFAULT_PROFILE,
    GENERATION_TIMEOUT, READ_TIMEOUT,
};
use crate::error::RelayError;
use std::{env, time::Duration};

/// Where the process is running, reported by the healthcheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Local,
    Vercel,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Local => "local",
            DeploymentMode::Vercel => "vercel",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub profile: GenerationProfile,
    pub mode: DeploymentMode,
    pub port: u16,
    pub generation_timeout: Duration,
    pub read_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = present("OPENAI_API_KEY")
            .ok_or_else(|| RelayError::Configuration("OPENAI_API_KEY is not set".to_string()))?;

        let api_base = present("OPENAI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| {
                log::info!("OPENAI_API_BASE not set, using {}", DEFAULT_API_BASE);
                DEFAULT_API_BASE.to_string()
            });

        let profile_name = present("GENERATION_PROFILE").unwrap_or_else(|| {
            log::warn!(
                "GENERATION_PROFILE not set, falling back to '{}'",
                DEFAULT_PROFILE
            );
            DEFAULT_PROFILE.to_string()
        });
        let profile = find_profile(profile_name.trim()).ok_or_else(|| {
            RelayError::Configuration(format!("unknown generation profile: {}", profile_name))
        })?;

        let mode = if present("VERCEL").is_some() {
            DeploymentMode::Vercel
        } else {
            DeploymentMode::Local
        };

        let port = match present("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| RelayError::Configuration(format!("invalid PORT: {}", raw)))?,
            None => {
                log::warn!("PORT not set, falling back to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        Ok(Config {
            api_key,
            api_base,
            profile,
            mode,
            port,
            generation_timeout: GENERATION_TIMEOUT,
            read_timeout: READ_TIMEOUT,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}
