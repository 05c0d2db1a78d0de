//! Movie descriptors and free-text normalization.
//!
//! Text fields are trimmed, stripped of apostrophes and lower-cased before
//! they reach persistence or comparison. Normalization never fails: input
//! that cannot be normalized leaves the field unset.

use serde::{Deserialize, Serialize};

use crate::constants::STRIPPED_QUOTE;
use crate::error::{DomainError, DomainResult};

/// Normalize a single free-text value.
///
/// The result is stable under repeated application.
pub fn normalize_text(value: &str) -> String {
    value
        .trim()
        .replace(STRIPPED_QUOTE, "")
        .to_lowercase()
        .trim()
        .to_string()
}

/// Normalize an optional scalar field. Missing or blank input stays unset.
fn normalize_field(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(normalize_text(v)),
        _ => None,
    }
}

/// Normalize an actor list, keeping relative order.
///
/// A missing or empty list stays unset; null entries and entries that are
/// empty after normalization are dropped.
fn normalize_actors(actors: Option<Vec<Option<String>>>) -> Option<Vec<String>> {
    let actors = actors.filter(|a| !a.is_empty())?;

    Some(
        actors
            .into_iter()
            .flatten()
            .map(|actor| normalize_text(&actor))
            .filter(|actor| !actor.is_empty())
            .collect(),
    )
}

/// Raw movie payload as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub director_name: Option<String>,
    #[serde(default)]
    pub actors: Option<Vec<Option<String>>>,
}

/// Normalized movie record. `None` means the field was not supplied,
/// which is distinct from `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDescriptor {
    pub name: Option<String>,
    pub year: i32,
    pub director_name: Option<String>,
    pub actors: Option<Vec<String>>,
}

impl MovieDescriptor {
    /// Build a descriptor, normalizing every text field.
    pub fn new(
        name: Option<&str>,
        year: i32,
        director_name: Option<&str>,
        actors: Option<Vec<Option<String>>>,
    ) -> Self {
        Self {
            name: normalize_field(name),
            year,
            director_name: normalize_field(director_name),
            actors: normalize_actors(actors),
        }
    }

    /// Attach a store id, requiring every text field to be set.
    pub fn into_stored(self, id: i32) -> DomainResult<StoredMovieDescriptor> {
        let name = self
            .name
            .ok_or_else(|| DomainError::validation("name is required"))?;
        let director_name = self
            .director_name
            .ok_or_else(|| DomainError::validation("directorName is required"))?;
        let actors = self
            .actors
            .ok_or_else(|| DomainError::validation("actors is required"))?;

        Ok(StoredMovieDescriptor {
            id,
            name,
            year: self.year,
            director_name,
            actors,
        })
    }
}

impl From<MovieInput> for MovieDescriptor {
    fn from(input: MovieInput) -> Self {
        MovieDescriptor::new(
            input.name.as_deref(),
            input.year,
            input.director_name.as_deref(),
            input.actors,
        )
    }
}

/// Movie record as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMovieDescriptor {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub director_name: String,
    pub actors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actors(list: &[Option<&str>]) -> Option<Vec<Option<String>>> {
        Some(list.iter().map(|a| a.map(str::to_string)).collect())
    }

    #[test]
    fn test_name_and_director_are_normalized() {
        let movie = MovieDescriptor::new(
            Some("  The Hitchhiker's Guide "),
            2005,
            Some("\tGarth JENNINGS\n"),
            None,
        );

        assert_eq!(movie.name.as_deref(), Some("the hitchhikers guide"));
        assert_eq!(movie.director_name.as_deref(), Some("garth jennings"));
        assert_eq!(movie.year, 2005);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in ["  O'Brien ", "' Leading quote'", "ALL CAPS", "d''arcy  "] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_blank_fields_are_unset() {
        for blank in [None, Some(""), Some("   "), Some("\t\n")] {
            let movie = MovieDescriptor::new(blank, 1999, blank, None);
            assert_eq!(movie.name, None);
            assert_eq!(movie.director_name, None);
        }
    }

    #[test]
    fn test_only_apostrophes_is_not_blank() {
        let movie = MovieDescriptor::new(Some("'"), 2000, Some("''"), None);

        assert_eq!(movie.name.as_deref(), Some(""));
        assert_eq!(movie.director_name.as_deref(), Some(""));
    }

    #[test]
    fn test_actor_list_drops_null_and_empty_entries() {
        let movie = MovieDescriptor::new(
            None,
            0,
            None,
            actors(&[Some("  O'Brien "), None, Some(""), Some("Smith")]),
        );

        assert_eq!(
            movie.actors,
            Some(vec!["obrien".to_string(), "smith".to_string()])
        );
    }

    #[test]
    fn test_actor_entry_empty_after_normalization_is_dropped() {
        let movie = MovieDescriptor::new(None, 0, None, actors(&[Some(" ' "), Some("B")]));

        assert_eq!(movie.actors, Some(vec!["b".to_string()]));
    }

    #[test]
    fn test_missing_or_empty_actor_list_is_unset() {
        assert_eq!(MovieDescriptor::new(None, 0, None, None).actors, None);
        assert_eq!(MovieDescriptor::new(None, 0, None, Some(vec![])).actors, None);
    }

    #[test]
    fn test_actor_list_of_only_nulls_is_empty_not_unset() {
        let movie = MovieDescriptor::new(None, 0, None, actors(&[None, None]));

        assert_eq!(movie.actors, Some(vec![]));
    }

    #[test]
    fn test_from_json_input() {
        let input: MovieInput = serde_json::from_str(
            r#"{"name":" Ocean's Eleven ","year":2001,"directorName":null,"actors":["George Clooney",null,"  "]}"#,
        )
        .unwrap();
        let movie = MovieDescriptor::from(input);

        assert_eq!(movie.name.as_deref(), Some("oceans eleven"));
        assert_eq!(movie.director_name, None);
        assert_eq!(movie.actors, Some(vec!["george clooney".to_string()]));
    }

    #[test]
    fn test_into_stored_requires_all_fields() {
        let complete = MovieDescriptor::new(Some("Heat"), 1995, Some("Michael Mann"), actors(&[Some("Al Pacino")]));
        let stored = complete.into_stored(42).unwrap();

        assert_eq!(stored.id, 42);
        assert_eq!(stored.name, "heat");
        assert_eq!(stored.director_name, "michael mann");
        assert_eq!(stored.actors, vec!["al pacino".to_string()]);

        let missing_director = MovieDescriptor::new(Some("Heat"), 1995, None, actors(&[Some("x")]));
        assert_eq!(
            missing_director.into_stored(1),
            Err(DomainError::validation("directorName is required"))
        );
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let movie = MovieDescriptor::new(Some("Heat"), 1995, Some("Mann"), None);
        let json = serde_json::to_value(&movie).unwrap();

        assert_eq!(json["directorName"], "mann");
        assert!(json["actors"].is_null());
    }
}
