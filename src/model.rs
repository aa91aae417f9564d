use serde::{Deserialize, Serialize};

/// The three inputs of the call form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    PhoneNumber,
    BotType,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::PhoneNumber, Field::BotType];

    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::PhoneNumber => "phoneNumber",
            Field::BotType => "botType",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::PhoneNumber => "Phone Number",
            Field::BotType => "Voice Agent",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub name: String,
    pub phone_number: String,
    // Catalog identifier; empty until an agent is picked
    pub bot_type: String,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::PhoneNumber => &self.phone_number,
            Field::BotType => &self.bot_type,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::PhoneNumber => self.phone_number = value,
            Field::BotType => self.bot_type = value,
        }
    }
}

/// Per-field validation messages. A field with a non-empty message blocks submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub bot_type: Option<String>,
}

impl FormErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::Name => &self.name,
            Field::PhoneNumber => &self.phone_number,
            Field::BotType => &self.bot_type,
        };
        slot.as_deref().filter(|m| !m.is_empty())
    }

    pub fn set(&mut self, field: Field, msg: impl Into<String>) {
        *self.slot_mut(field) = Some(msg.into());
    }

    pub fn clear(&mut self, field: Field) {
        *self.slot_mut(field) = None;
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Fields that currently carry a message, in form order.
    pub fn fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::PhoneNumber => &mut self.phone_number,
            Field::BotType => &mut self.bot_type,
        }
    }
}

/// Per-call payload embedded in the dispatch command. Key order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    pub phone_number: String,
    pub company_name: String,
    pub candidate_name: String,
}
