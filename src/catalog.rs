use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotTypeConfig {
    /// Invocation template: the fixed part of the command before per-call metadata.
    pub command: String,
    /// Label shown in the agent picker and in notifications.
    pub name: String,
}

/// One `bots:` entry in `dialer.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotEntry {
    pub id: String,
    #[serde(flatten)]
    pub config: BotTypeConfig,
}

impl BotEntry {
    fn new(id: &str, name: &str, command: &str) -> Self {
        Self {
            id: id.to_string(),
            config: BotTypeConfig {
                command: command.to_string(),
                name: name.to_string(),
            },
        }
    }
}

pub fn default_bot_entries() -> Vec<BotEntry> {
    vec![
        BotEntry::new(
            "openai-multimodal-bot",
            "OpenAI Multimodal Bot",
            "lk dispatch create --new-room --agent-name outbound-multimodel-caller",
        ),
        BotEntry::new(
            "openai-multimodal-hindi-bot",
            "OpenAI Multimodal Bot (Hindi)",
            "lk dispatch create --new-room --agent-name outbound-multimodel-hindi-caller",
        ),
        BotEntry::new(
            "azure-based-voice-bot",
            "Azure Based Voice Bot",
            "lk dispatch create --new-room --agent-name outbound-azure-caller",
        ),
    ]
}

/// Immutable identifier -> bot mapping. Iteration order is the picker order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCatalog {
    entries: Vec<BotEntry>,
}

impl Default for BotCatalog {
    fn default() -> Self {
        Self {
            entries: default_bot_entries(),
        }
    }
}

impl BotCatalog {
    pub fn from_entries(entries: Vec<BotEntry>) -> Result<Self, String> {
        validate_entries(&entries)?;
        Ok(Self { entries })
    }

    pub fn get(&self, id: &str) -> Option<&BotTypeConfig> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.config)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn entry(&self, idx: usize) -> Option<&BotEntry> {
        self.entries.get(idx)
    }

    pub fn entries(&self) -> &[BotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name for an identifier, falling back to the identifier itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(id)
    }
}

pub(crate) fn validate_entries(entries: &[BotEntry]) -> Result<(), String> {
    use std::collections::HashSet;
    if entries.is_empty() {
        return Err("bots: at least one voice agent is required".to_string());
    }
    let mut ids = HashSet::new();
    for (i, e) in entries.iter().enumerate() {
        if e.id.trim().is_empty() {
            return Err(format!("bots[{i}]: id must not be empty"));
        }
        if !ids.insert(e.id.as_str()) {
            return Err(format!("bots[{i}]: duplicate bot id '{}'", e.id));
        }
        if e.config.name.trim().is_empty() {
            return Err(format!("bots[{i}] '{}': name must not be empty", e.id));
        }
        if e.config.command.trim().is_empty() {
            return Err(format!("bots[{i}] '{}': command must not be empty", e.id));
        }
    }
    Ok(())
}
