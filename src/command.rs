use crate::catalog::BotCatalog;
use crate::error::CommandError;
use crate::model::CallMetadata;
use serde::{Deserialize, Serialize};

/// Organization name and credentials appended to every dispatch command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    #[serde(default = "default_company_name")]
    pub company_name: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_api_secret")]
    pub api_secret: String,
}

fn default_company_name() -> String {
    "Maxicus".to_string()
}

fn default_api_key() -> String {
    "devkey".to_string()
}

fn default_api_secret() -> String {
    "secret".to_string()
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            api_key: default_api_key(),
            api_secret: default_api_secret(),
        }
    }
}

// Wrap in single quotes so the JSON stays one shell word; embedded quotes become '\''
fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

pub fn build_command(
    catalog: &BotCatalog,
    settings: &DispatchSettings,
    bot_type: &str,
    phone_number: &str,
    name: &str,
) -> Result<String, CommandError> {
    let Some(bot) = catalog.get(bot_type) else {
        tracing::error!(bot_type, "no catalog entry for bot type");
        return Err(CommandError::UnknownBotType(bot_type.to_string()));
    };
    let metadata = serde_json::to_string(&CallMetadata {
        phone_number: phone_number.to_string(),
        company_name: settings.company_name.clone(),
        candidate_name: name.to_string(),
    })?;
    tracing::debug!(bot = %bot.name, template = %bot.command, %metadata, "building dispatch command");
    Ok(format!(
        "{} --metadata {} --api-key {} --api-secret {}",
        bot.command,
        single_quote(&metadata),
        settings.api_key,
        settings.api_secret
    ))
}

/// Recover the metadata argument from a command produced by [`build_command`].
pub fn extract_metadata(command: &str) -> Option<CallMetadata> {
    let parts = shlex::split(command)?;
    let idx = parts.iter().position(|p| p == "--metadata")?;
    let raw = parts.get(idx + 1)?;
    serde_json::from_str(raw).ok()
}
