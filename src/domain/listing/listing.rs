//! Listing fact sheet - structured, host-maintained facts about a property.

use serde::{Deserialize, Serialize};

/// Structured facts about one rentable property.
///
/// Every fact is optional: hosts fill in what they have, and a missing fact
/// means the corresponding topic cannot be answered from the listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Listing {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub check_in_time: Option<String>,
    pub check_in_end_time: Option<String>,
    pub check_out_time: Option<String>,
    pub wifi_network: Option<String>,
    pub wifi_password: Option<String>,
    pub door_code: Option<String>,
    pub access_instructions: Option<String>,
    pub house_rules: Option<String>,
    pub amenities: Vec<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub special_instructions: Option<String>,
}

impl Listing {
    /// Free-text special instructions, if the host provided any.
    pub fn special_instructions(&self) -> Option<&str> {
        present(&self.special_instructions)
    }

    /// Short human label for prompts ("Casa Azul, Valencia").
    pub fn label(&self) -> Option<String> {
        match (present(&self.name), present(&self.city)) {
            (Some(name), Some(city)) => Some(format!("{}, {}", name, city)),
            (Some(name), None) => Some(name.to_string()),
            (None, Some(city)) => Some(city.to_string()),
            (None, None) => None,
        }
    }
}

/// Returns the trimmed value when it is set and non-blank.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
