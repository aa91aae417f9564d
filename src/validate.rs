use crate::model::{Field, FormData, FormErrors};
use regex::Regex;
use std::sync::OnceLock;

pub const PHONE_PATTERN: &str = r"^\+?[0-9\s\-()]{8,20}$";

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Compute the full error set for a form. An empty result means the form may be submitted.
pub fn validate(data: &FormData) -> FormErrors {
    let mut errors = FormErrors::default();
    if data.name.trim().is_empty() {
        errors.set(Field::Name, "Name is required");
    }
    // The pattern is checked against the raw input, only emptiness is trimmed
    if data.phone_number.trim().is_empty() {
        errors.set(Field::PhoneNumber, "Phone number is required");
    } else if !is_valid_phone(&data.phone_number) {
        errors.set(Field::PhoneNumber, "Please enter a valid phone number");
    }
    if data.bot_type.is_empty() {
        errors.set(Field::BotType, "Please select a voicebot");
    }
    errors
}
