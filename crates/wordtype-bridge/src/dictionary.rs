//! Dictionaries available for practice.
//!
//! The list is owned by the [`DictionaryResource`] and never mutated after
//! construction. Application state only ever refers to dictionaries from
//! this list (see [`crate::state::AppState::dictionaries`]).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A word list the user can practice with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Dictionary {
    /// Stable identifier, used for lookups and persisted selections.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    pub description: String,
    pub category: String,
    /// Location of the word list contents.
    pub url: String,
    /// Number of words in the dictionary.
    pub length: u32,
    pub language: String,
}

impl Dictionary {
    fn bundled(id: &str, name: &str, description: &str, category: &str, length: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            url: format!("./dicts/{id}.json"),
            length,
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryResourceError {
    /// The resource must contain at least one dictionary so that a default
    /// selection exists.
    #[error("dictionary resource is empty")]
    Empty,
}

/// Ordered, read-only list of available dictionaries.
///
/// Cloning is cheap: clones share the same underlying list, and
/// [`DictionaryResource::all`] always hands out that same allocation.
#[derive(Debug, Clone)]
pub struct DictionaryResource {
    dictionaries: Arc<[Dictionary]>,
}

impl DictionaryResource {
    pub fn new(dictionaries: Vec<Dictionary>) -> Result<Self, DictionaryResourceError> {
        if dictionaries.is_empty() {
            return Err(DictionaryResourceError::Empty);
        }
        Ok(Self {
            dictionaries: dictionaries.into(),
        })
    }

    /// The dictionaries bundled with the application.
    pub fn builtin() -> Self {
        Self {
            dictionaries: vec![
                Dictionary::bundled("cet4", "CET-4", "College English Test band 4", "exam", 2607),
                Dictionary::bundled("cet6", "CET-6", "College English Test band 6", "exam", 2345),
                Dictionary::bundled("kaoyan", "Kaoyan", "Postgraduate entrance exam", "exam", 3728),
                Dictionary::bundled("toefl", "TOEFL", "Test of English as a Foreign Language", "exam", 4264),
                Dictionary::bundled("ielts", "IELTS", "International English Language Testing System", "exam", 3575),
                Dictionary::bundled("gre", "GRE", "Graduate Record Examinations", "exam", 6515),
                Dictionary::bundled("coder", "Coder", "Common words in programming", "code", 1700),
            ]
            .into(),
        }
    }

    /// Returns the shared list of dictionaries.
    pub fn all(&self) -> Arc<[Dictionary]> {
        Arc::clone(&self.dictionaries)
    }

    /// Returns the first dictionary, used as the default selection.
    pub fn first(&self) -> &Dictionary {
        // Non-empty by construction.
        &self.dictionaries[0]
    }

    pub fn find(&self, id: &str) -> Option<&Dictionary> {
        find_by_id(&self.dictionaries, id)
    }
}

/// Finds a dictionary by id in the given list.
pub fn find_by_id<'a>(dictionaries: &'a [Dictionary], id: &str) -> Option<&'a Dictionary> {
    dictionaries.iter().find(|dictionary| dictionary.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_resource_is_rejected() {
        assert!(matches!(
            DictionaryResource::new(Vec::new()),
            Err(DictionaryResourceError::Empty)
        ));
    }

    #[test]
    fn all_shares_one_list() {
        let resource = DictionaryResource::builtin();
        assert!(Arc::ptr_eq(&resource.all(), &resource.all()));
        assert!(Arc::ptr_eq(&resource.all(), &resource.clone().all()));
    }

    #[test]
    fn find_by_id_reports_found_and_missing() {
        let resource = DictionaryResource::builtin();
        assert_eq!(resource.find("cet6").map(|d| d.name.as_str()), Some("CET-6"));
        assert!(resource.find("does-not-exist").is_none());
        assert_eq!(resource.first().id, "cet4");
    }
}
