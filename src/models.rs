//! Data models.

use serde::{Deserialize, Deserializer};

/// Person record as returned by the people endpoint
///
/// See: https://swapi.py4e.com/documentation#people
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct RawPerson {
    pub name: Option<String>,
    pub birth_year: Option<String>,
    pub eye_color: Option<String>,
    pub gender: Option<String>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    /// Height in centimeters, "unknown" if not available
    pub height: Option<String>,
    /// Mass in kilograms, may contain separators ("1,358") or "unknown"
    pub mass: Option<String>,
    /// Canonical url of this record, ends with `/{id}/`
    pub url: Option<String>,
    /// Film urls
    #[serde(deserialize_with = "deserialize_url_list")]
    pub films: Vec<String>,
    /// Species urls
    #[serde(deserialize_with = "deserialize_url_list")]
    pub species: Vec<String>,
    /// Starship urls
    #[serde(deserialize_with = "deserialize_url_list")]
    pub starships: Vec<String>,
    /// Vehicle urls
    #[serde(deserialize_with = "deserialize_url_list")]
    pub vehicles: Vec<String>,
    /// Planet url, None if missing, null or empty
    #[serde(deserialize_with = "deserialize_optional_url")]
    pub homeworld: Option<String>,
}

/// Person with every reference url replaced by the referenced name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Person {
    pub name: Option<String>,
    pub birth_year: Option<String>,
    pub eye_color: Option<String>,
    pub gender: Option<String>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub height: Option<String>,
    pub mass: Option<String>,
    pub url: Option<String>,
    pub films: Vec<String>,
    pub species: Vec<String>,
    pub starships: Vec<String>,
    pub vehicles: Vec<String>,
    /// Resolved planet names; Some (with zero or one name) only if the raw
    /// record had a homeworld url
    pub homeworld: Option<Vec<String>>,
}

/// Outcome of enriching one requested id
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedPerson {
    Found(Person),
    NotFound { id: u32 },
}

impl FetchedPerson {
    pub fn is_found(&self) -> bool {
        matches!(self, FetchedPerson::Found(_))
    }
}

fn deserialize_url_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|url| !url.is_empty()))
}
