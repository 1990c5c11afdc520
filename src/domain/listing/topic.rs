//! Topic categories a listing can answer directly.
//!
//! Categories are a declarative table: each row names the canonical field,
//! the aliases a classifier may emit, the keywords a guest may type, a base
//! confidence and a formatter that turns listing facts into an answer.
//! Adding a category means adding a row, not touching resolver control flow.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::listing::{present, Listing};

/// Canonical topic categories, in keyword-scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TopicCategory {
    CheckIn,
    CheckOut,
    Wifi,
    Access,
    Location,
    Rules,
    Amenities,
    Contact,
}

/// One row of the category table.
pub struct CategoryEntry {
    pub category: TopicCategory,
    pub field: &'static str,
    pub aliases: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub base_confidence: f64,
    pub format: fn(&Listing) -> Option<String>,
}

static CATEGORY_TABLE: [CategoryEntry; 8] = [
    CategoryEntry {
        category: TopicCategory::CheckIn,
        field: "checkIn",
        aliases: &["checkin", "checkintime", "arrival", "arrivaltime"],
        keywords: &[
            "check-in", "checkin", "check in", "arrival", "arrive", "llegada", "llegar",
            "entrada",
        ],
        base_confidence: 0.9,
        format: format_check_in,
    },
    CategoryEntry {
        category: TopicCategory::CheckOut,
        field: "checkOut",
        aliases: &["checkout", "checkouttime", "departure"],
        keywords: &[
            "check-out", "checkout", "check out", "departure", "salida", "salir",
        ],
        base_confidence: 0.9,
        format: format_check_out,
    },
    CategoryEntry {
        category: TopicCategory::Wifi,
        field: "wifi",
        aliases: &["wifi", "wifinetwork", "wifipassword", "internet"],
        keywords: &["wifi", "wi-fi", "internet", "password", "contraseña", "contrasena"],
        base_confidence: 0.95,
        format: format_wifi,
    },
    CategoryEntry {
        category: TopicCategory::Access,
        field: "access",
        aliases: &["access", "doorcode", "accesscode", "entry", "keys"],
        keywords: &[
            "door", "code", "key", "lock", "access", "puerta", "código", "codigo", "llave",
            "acceso",
        ],
        base_confidence: 0.9,
        format: format_access,
    },
    CategoryEntry {
        category: TopicCategory::Location,
        field: "location",
        aliases: &["location", "address", "directions"],
        keywords: &[
            "address", "located", "location", "directions", "dirección", "direccion",
            "ubicación", "ubicacion",
        ],
        base_confidence: 0.9,
        format: format_location,
    },
    CategoryEntry {
        category: TopicCategory::Rules,
        field: "rules",
        aliases: &["rules", "houserules", "policies"],
        keywords: &[
            "rule", "smoking", "smoke", "pets", "party", "quiet hours", "normas", "reglas",
            "fumar", "mascotas", "fiesta",
        ],
        base_confidence: 0.85,
        format: format_rules,
    },
    CategoryEntry {
        category: TopicCategory::Amenities,
        field: "amenities",
        aliases: &["amenities", "facilities"],
        keywords: &[
            "amenit", "pool", "parking", "towel", "kitchen", "washer", "piscina", "toalla",
            "cocina", "estacionamiento", "aparcamiento", "lavadora",
        ],
        base_confidence: 0.8,
        format: format_amenities,
    },
    CategoryEntry {
        category: TopicCategory::Contact,
        field: "contact",
        aliases: &["contact", "hostcontact", "phone", "host"],
        keywords: &[
            "contact", "phone", "call", "host", "email", "contacto", "teléfono", "telefono",
            "llamar", "anfitrión", "anfitrion",
        ],
        base_confidence: 0.95,
        format: format_contact,
    },
];

/// Normalized field name or alias → category.
static ALIAS_INDEX: Lazy<HashMap<String, TopicCategory>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for entry in CATEGORY_TABLE.iter() {
        index.insert(normalize_field(entry.field), entry.category);
        for alias in entry.aliases {
            index.insert(normalize_field(alias), entry.category);
        }
    }
    index
});

/// Keywords shorter than this (in bytes) are matched at word starts only.
const SHORT_KEYWORD_LEN: usize = 5;

fn keyword_in(haystack: &str, keyword: &str) -> bool {
    if keyword.len() >= SHORT_KEYWORD_LEN || !keyword.is_ascii() {
        return haystack.contains(keyword);
    }
    haystack.match_indices(keyword).any(|(at, _)| {
        haystack[..at]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

fn normalize_field(field: &str) -> String {
    field
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl TopicCategory {
    /// All categories in table order.
    pub fn all() -> impl Iterator<Item = TopicCategory> {
        CATEGORY_TABLE.iter().map(|entry| entry.category)
    }

    /// Canonical field names, the closed vocabulary offered to classifiers.
    pub fn field_names() -> Vec<&'static str> {
        CATEGORY_TABLE.iter().map(|entry| entry.field).collect()
    }

    /// Resolves a detected field (or one of its aliases) to a category.
    pub fn from_field(field: &str) -> Option<Self> {
        ALIAS_INDEX.get(&normalize_field(field)).copied()
    }

    /// The table row for this category.
    pub fn entry(&self) -> &'static CategoryEntry {
        // rows are declared in enum order
        &CATEGORY_TABLE[*self as usize]
    }

    pub fn field(&self) -> &'static str {
        self.entry().field
    }

    pub fn base_confidence(&self) -> f64 {
        self.entry().base_confidence
    }

    /// Case-insensitive substring scan of the question for this category's keywords.
    ///
    /// Short ASCII keywords must start a word, so "lock" does not fire on
    /// "o'clock" nor "host" on "ghost". Longer or non-ASCII keywords match
    /// anywhere.
    pub fn mentioned_in(&self, question: &str) -> bool {
        let haystack = question.to_lowercase();
        self.entry()
            .keywords
            .iter()
            .any(|kw| keyword_in(&haystack, kw))
    }

    /// Synthesizes an answer from the listing, or `None` if the facts are missing.
    pub fn answer(&self, listing: &Listing) -> Option<String> {
        (self.entry().format)(listing)
    }
}

impl fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatters
// ─────────────────────────────────────────────────────────────────────────────

fn format_check_in(listing: &Listing) -> Option<String> {
    let start = present(&listing.check_in_time)?;
    Some(match present(&listing.check_in_end_time) {
        Some(end) => format!("Check-in is from {} until {}.", start, end),
        None => format!("Check-in is from {}.", start),
    })
}

fn format_check_out(listing: &Listing) -> Option<String> {
    present(&listing.check_out_time).map(|time| format!("Check-out is by {}.", time))
}

fn format_wifi(listing: &Listing) -> Option<String> {
    match (present(&listing.wifi_network), present(&listing.wifi_password)) {
        (Some(network), Some(password)) => Some(format!(
            "WiFi network: {}. Password: {}.",
            network, password
        )),
        (Some(network), None) => Some(format!("WiFi network: {}.", network)),
        (None, Some(password)) => Some(format!("WiFi password: {}.", password)),
        (None, None) => None,
    }
}

fn format_access(listing: &Listing) -> Option<String> {
    let parts: Vec<String> = [
        present(&listing.door_code).map(|code| format!("Door code: {}.", code)),
        present(&listing.access_instructions).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();
    join_sentences(parts)
}

fn format_location(listing: &Listing) -> Option<String> {
    match (present(&listing.address), present(&listing.city)) {
        (Some(address), Some(city)) => Some(format!("The address is {}, {}.", address, city)),
        (Some(address), None) => Some(format!("The address is {}.", address)),
        _ => None,
    }
}

fn format_rules(listing: &Listing) -> Option<String> {
    present(&listing.house_rules).map(|rules| format!("House rules: {}", rules))
}

fn format_amenities(listing: &Listing) -> Option<String> {
    let amenities: Vec<&str> = listing
        .amenities
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if amenities.is_empty() {
        return None;
    }
    Some(format!("Amenities: {}.", amenities.join(", ")))
}

fn format_contact(listing: &Listing) -> Option<String> {
    let parts: Vec<String> = [
        present(&listing.contact_name).map(|name| format!("Your host is {}.", name)),
        present(&listing.contact_phone).map(|phone| format!("Phone: {}.", phone)),
        present(&listing.contact_email).map(|email| format!("Email: {}.", email)),
    ]
    .into_iter()
    .flatten()
    .collect();
    // a name alone is not a way to reach anyone
    if present(&listing.contact_phone).is_none() && present(&listing.contact_email).is_none() {
        return None;
    }
    join_sentences(parts)
}

fn join_sentences(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
