//! Reference resolution and record enrichment

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    errors::LoaderError,
    http::{FetchOutcome, HttpClient},
    models::{FetchedPerson, Person, RawPerson},
};

/// Fallback for referenced documents without a `name` field
pub const UNKNOWN_NAME: &str = "Unknown";

/// Resolve reference urls to names, one request at a time.
///
/// Output keeps input order. Urls whose fetch fails are dropped, so the
/// result may be shorter than the input.
pub async fn resolve_names<C>(urls: &[String], client: &C) -> Result<Vec<String>, LoaderError>
where
    C: HttpClient + ?Sized,
{
    let mut names = Vec::with_capacity(urls.len());
    for url in urls {
        match client.fetch_json(url).await? {
            FetchOutcome::Found(document) => names.push(name_of(&document)),
            FetchOutcome::Failed(status) => {
                warn!(url = url.as_str(), status, "Dropping unresolved reference");
            }
        }
    }
    Ok(names)
}

fn name_of(document: &Value) -> String {
    document
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

/// Url of a single person on the people endpoint
pub fn person_url(base_url: &str, id: u32) -> String {
    format!("{}/{}/", base_url.trim_end_matches('/'), id)
}

/// Fetch person `id` and resolve all of its references.
///
/// References are resolved in a fixed order: films, species, starships,
/// vehicles, homeworld.
pub async fn enrich_person<C>(
    id: u32,
    client: &C,
    base_url: &str,
) -> Result<FetchedPerson, LoaderError>
where
    C: HttpClient + ?Sized,
{
    let url = person_url(base_url, id);
    let document = match client.fetch_json(&url).await? {
        FetchOutcome::Found(document) => document,
        FetchOutcome::Failed(status) => {
            info!(id, status, "Person not found");
            return Ok(FetchedPerson::NotFound { id });
        }
    };
    let raw: RawPerson = serde_json::from_value(document)?;

    let films = resolve_names(&raw.films, client).await?;
    let species = resolve_names(&raw.species, client).await?;
    let starships = resolve_names(&raw.starships, client).await?;
    let vehicles = resolve_names(&raw.vehicles, client).await?;
    let homeworld = match raw.homeworld {
        Some(planet) => Some(resolve_names(&[planet], client).await?),
        None => None,
    };
    debug!(id, name = raw.name.as_deref(), "Enriched person");

    Ok(FetchedPerson::Found(Person {
        name: raw.name,
        birth_year: raw.birth_year,
        eye_color: raw.eye_color,
        gender: raw.gender,
        hair_color: raw.hair_color,
        skin_color: raw.skin_color,
        height: raw.height,
        mass: raw.mass,
        url: raw.url,
        films,
        species,
        starships,
        vehicles,
        homeworld,
    }))
}
