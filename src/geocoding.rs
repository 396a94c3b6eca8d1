//! Geocoding with a fallback provider, and autocomplete ranking.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::error::GeocodeError;
use crate::model::PlaceSuggestion;
use crate::traits::GeocodingProvider;

/// Maximum number of suggestions returned for partial input.
pub const MAX_SUGGESTIONS: usize = 5;

/// Shortest partial input worth querying.
pub const MIN_QUERY_LEN: usize = 2;

/// Tries `primary`, then `secondary` when the primary fails for any reason.
#[derive(Debug, Clone)]
pub struct FallbackGeocoder<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackGeocoder<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P, S> GeocodingProvider for FallbackGeocoder<P, S>
where
    P: GeocodingProvider,
    S: GeocodingProvider,
{
    fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        match self.primary.resolve(place) {
            Ok(coordinate) => return Ok(coordinate),
            Err(err) => warn!(%place, %err, "primary geocoder failed, trying fallback"),
        }

        self.secondary.resolve(place).map_err(|err| {
            warn!(%place, %err, "fallback geocoder failed");
            GeocodeError::NotFound(place.to_string())
        })
    }
}

/// A raw place candidate as returned by an autocomplete service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceCandidate {
    pub locality: Option<String>,
    pub name: Option<String>,
    pub county: Option<String>,
    pub region: Option<String>,
    pub location: Coordinate,
}

/// Filter and rank raw candidates for `query`.
///
/// Keeps candidates whose city starts with the query (case-insensitive,
/// untrimmed: leading spaces never match),
/// drops duplicate city names, and stops at [`MAX_SUGGESTIONS`].
pub fn rank_suggestions<I>(query: &str, candidates: I) -> Vec<PlaceSuggestion>
where
    I: IntoIterator<Item = PlaceCandidate>,
{
    let query = query.to_lowercase();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();

    for candidate in candidates {
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }

        let city = [candidate.locality.as_deref(), candidate.name.as_deref()]
            .into_iter()
            .flatten()
            .map(normalize_whitespace)
            .find(|city| !city.is_empty());
        let Some(city) = city else {
            continue;
        };

        let key = city.to_lowercase();
        if !key.starts_with(&query) || !seen.insert(key) {
            continue;
        }

        let qualifier = candidate
            .county
            .as_deref()
            .filter(|county| !county.is_empty())
            .or(candidate.region.as_deref().filter(|region| !region.is_empty()));
        let label = match qualifier {
            Some(qualifier) => format!("{city}, {qualifier}"),
            None => city.clone(),
        };

        suggestions.push(PlaceSuggestion {
            label,
            city,
            location: candidate.location,
        });
    }

    debug!(%query, count = suggestions.len(), "ranked suggestions");
    suggestions
}

fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
