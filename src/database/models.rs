// src/database/models.rs
use crate::{errors::LoaderError, models::Person};

/// Separator for list columns
const LIST_SEPARATOR: &str = ", ";

/// One row of the `swapi` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PersonRow {
    pub id: i32,
    pub birth_year: Option<String>,
    pub eye_color: Option<String>,
    pub films: String,
    pub gender: Option<String>,
    pub hair_color: Option<String>,
    pub height: i32, // 0 when not a plain number
    pub homeworld: Option<String>,
    pub mass: Option<i32>,
    pub name: Option<String>,
    pub skin_color: Option<String>,
    pub species: String,
    pub starships: String,
    pub vehicles: String,
}

impl TryFrom<&Person> for PersonRow {
    type Error = LoaderError;

    fn try_from(person: &Person) -> Result<Self, Self::Error> {
        let url = person.url.as_deref().unwrap_or_default();
        Ok(Self {
            id: record_id(url)?,
            birth_year: person.birth_year.clone(),
            eye_color: person.eye_color.clone(),
            films: person.films.join(LIST_SEPARATOR),
            gender: person.gender.clone(),
            hair_color: person.hair_color.clone(),
            height: parse_digits(person.height.as_deref()).unwrap_or(0),
            homeworld: person
                .homeworld
                .as_ref()
                .filter(|names| !names.is_empty())
                .map(|names| names.join(LIST_SEPARATOR)),
            mass: parse_digits(person.mass.as_deref()),
            name: person.name.clone(),
            skin_color: person.skin_color.clone(),
            species: person.species.join(LIST_SEPARATOR),
            starships: person.starships.join(LIST_SEPARATOR),
            vehicles: person.vehicles.join(LIST_SEPARATOR),
        })
    }
}

/// Id embedded in a record url, the second to last path segment
/// (`.../people/5/` -> 5)
pub(crate) fn record_id(url: &str) -> Result<i32, LoaderError> {
    url.split('/')
        .rev()
        .nth(1)
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| LoaderError::InvalidRecordUrl(url.to_string()))
}

/// Parse values made only of ASCII digits; anything else is None
fn parse_digits(value: Option<&str>) -> Option<i32> {
    value
        .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|v| v.parse().ok())
}
