//! Environment bootstrap and credential resolution

use super::manager::ProviderManager;
use crate::config::{OLLAMA_DEFAULT_HOST, ProviderConfig, ProviderType};
use crate::utils::error::{OrchestratorError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable lookup
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Providers created from their well-known API key variable, with the label
/// used to detect an existing row
pub const ENV_PROVIDERS: &[(ProviderType, &str)] = &[
    (ProviderType::Google, "Google AI Studio (Env)"),
    (ProviderType::Mistral, "Mistral API (Env)"),
    (ProviderType::OpenRouter, "OpenRouter (Env)"),
    (ProviderType::Groq, "Groq (Env)"),
    (ProviderType::Nvidia, "NVIDIA (Env)"),
    (ProviderType::Cerebras, "Cerebras (Env)"),
];

const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";
const OLLAMA_PROVIDER_ID: &str = "ollama-local";
const OLLAMA_DETECT_TIMEOUT: Duration = Duration::from_secs(2);

pub(super) fn process_env() -> EnvLookup {
    Arc::new(|key: &str| std::env::var(key).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `<ID>_API_KEY` with the id upper-cased and every non-alphanumeric
/// character replaced by `_`
pub(super) fn convention_key(provider_id: &str) -> String {
    let id: String = provider_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_API_KEY", id)
}

/// OpenAI-compatible API root for an Ollama host
fn ollama_api_base(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.ends_with("/v1") {
        host.to_string()
    } else {
        format!("{}/v1", host)
    }
}

fn ollama_host(env: &(dyn Fn(&str) -> Option<String> + Send + Sync)) -> String {
    non_empty(env(OLLAMA_HOST_ENV))
        .map(|host| ollama_api_base(&host))
        .unwrap_or_else(|| OLLAMA_DEFAULT_HOST.to_string())
}

/// Fill in the credential and, for Ollama, the base URL of a provider row
///
/// Key precedence: the family variable (e.g. `GROQ_API_KEY`), then the
/// `<ID>_API_KEY` convention, then the key stored on the row. Every family
/// except Ollama needs a key.
pub fn resolve_credentials(
    mut config: ProviderConfig,
    env: &(dyn Fn(&str) -> Option<String> + Send + Sync),
) -> Result<ProviderConfig> {
    if config.provider_type == ProviderType::Ollama {
        if config.base_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
            config.base_url = Some(ollama_host(env));
        }
        config.api_key = non_empty(env("OLLAMA_API_KEY")).or(config.api_key);
        return Ok(config);
    }

    let family_var = config.provider_type.api_key_env();
    let convention_var = convention_key(&config.id);

    let from_family = family_var.and_then(|var| non_empty(env(var)));
    let api_key = from_family
        .inspect(|_| debug!(provider = %config.id, "Using family API key variable"))
        .or_else(|| non_empty(env(&convention_var)))
        .or_else(|| non_empty(config.api_key.take()));

    match api_key {
        Some(key) => {
            config.api_key = Some(key);
            Ok(config)
        }
        None => Err(OrchestratorError::provider_config(
            &config.id,
            format!(
                "no API key found; set {}",
                family_var.unwrap_or(convention_var.as_str())
            ),
        )),
    }
}

impl ProviderManager {
    /// Create provider rows for well-known API key variables
    ///
    /// A row is created only when no row with the same label exists. Store
    /// failures are logged and do not abort initialization.
    pub(super) async fn bootstrap_from_env(&self) -> usize {
        let mut created = 0;

        for (provider_type, label) in ENV_PROVIDERS {
            let Some(var) = provider_type.api_key_env() else {
                continue;
            };
            if non_empty((self.env)(var)).is_none() {
                continue;
            }

            match self.store.find_by_label(label).await {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                Err(e) => {
                    warn!(label = %label, error = %e, "Provider lookup failed during bootstrap");
                    continue;
                }
            }

            let id = format!("{}-env", provider_type);
            info!(provider = %id, "Bootstrapping provider from environment");
            let row = ProviderConfig::new(id.clone(), *label, provider_type.clone());
            match self.store.upsert(row).await {
                Ok(()) => created += 1,
                Err(e) => warn!(provider = %id, error = %e, "Failed to store bootstrapped provider"),
            }
        }

        created
    }

    /// Register a local Ollama instance if one answers at `OLLAMA_HOST`
    ///
    /// Skipped when an Ollama row already exists in the store.
    pub(super) async fn detect_local_ollama(&self) -> bool {
        let api_base = ollama_host(self.env.as_ref());
        let root = api_base.trim_end_matches("/v1").to_string();

        match self.store.load_enabled().await {
            Ok(rows) if rows.iter().any(|r| r.provider_type == ProviderType::Ollama) => {
                return false;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Provider lookup failed during Ollama detection");
                return false;
            }
        }

        let client = match reqwest::Client::builder()
            .timeout(OLLAMA_DETECT_TIMEOUT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                debug!(error = %e, "Could not build Ollama detection client");
                return false;
            }
        };

        let running = match client.get(&root).send().await {
            Ok(response) if response.status().is_success() => response
                .text()
                .await
                .is_ok_and(|body| body.contains("Ollama is running")),
            _ => false,
        };
        if !running {
            debug!(host = %root, "No local Ollama detected");
            return false;
        }

        info!(host = %root, "Detected local Ollama");
        let row = ProviderConfig::new(OLLAMA_PROVIDER_ID, "Ollama (Local)", ProviderType::Ollama)
            .with_base_url(api_base);
        match self.store.upsert(row).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to store detected Ollama provider");
                false
            }
        }
    }
}
