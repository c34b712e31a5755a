use std::{fmt, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::dictionary::{Dictionary, DictionaryResource};

/// Window opacity presets, cycled through in order by the footer button.
pub const OPACITY_PRESETS: [f64; 4] = [0.1, 0.25, 0.5, 1.0];

/// Returns the preset following `current`, wrapping to the first preset
/// after the last one. A value outside of the presets restarts the cycle.
pub fn next_opacity(current: f64) -> f64 {
    let next_index = match OPACITY_PRESETS.iter().position(|preset| *preset == current) {
        Some(index) => (index + 1) % OPACITY_PRESETS.len(),
        None => 0,
    };
    OPACITY_PRESETS[next_index]
}

/// Which accent is used for word pronunciation, if any.
///
/// Persisted as `"us"`, `"uk"`, `"jap"`, or `false` when disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pronunciation {
    #[default]
    Us,
    Uk,
    Jap,
    Disabled,
}

impl Pronunciation {
    /// Returns the accent name, or `None` when pronunciation is disabled.
    pub fn accent(self) -> Option<&'static str> {
        match self {
            Pronunciation::Us => Some("us"),
            Pronunciation::Uk => Some("uk"),
            Pronunciation::Jap => Some("jap"),
            Pronunciation::Disabled => None,
        }
    }
}

impl Serialize for Pronunciation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.accent() {
            Some(accent) => serializer.serialize_str(accent),
            None => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Pronunciation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PronunciationVisitor;

        impl de::Visitor<'_> for PronunciationVisitor {
            type Value = Pronunciation;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#""us", "uk", "jap" or false"#)
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                if value {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(Pronunciation::Disabled)
                }
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                match value {
                    "us" => Ok(Pronunciation::Us),
                    "uk" => Ok(Pronunciation::Uk),
                    "jap" => Ok(Pronunciation::Jap),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(PronunciationVisitor)
    }
}

/// The single canonical record of user preferences shared across the UI.
///
/// Values are never mutated in place once published: every change produces
/// a new `AppState` which replaces the previous one as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Whether keyboard sound feedback is enabled.
    pub sound: bool,
    /// Available dictionaries. Always the live list from the
    /// [`DictionaryResource`] and never persisted.
    pub dictionaries: Arc<[Dictionary]>,
    /// The dictionary being practiced, a member of `dictionaries`.
    pub selected_dictionary: Dictionary,
    pub pronunciation: Pronunciation,
    /// Index into the selected dictionary's chapters. Reset to 0 whenever
    /// the selected dictionary changes.
    pub selected_chapter: u32,
    /// Whether words are shuffled.
    pub random: bool,
    /// Whether a single word is repeated.
    pub loop_word: bool,
    /// Whether phonetic symbols are shown.
    pub phonetic: bool,
    pub dark_mode: bool,
    /// Whether pronunciation repeats until the word is spelled right.
    pub sound_loop: bool,
    /// Window opacity, one of [`OPACITY_PRESETS`] when set by cycling.
    pub opacity: f64,
}

impl AppState {
    /// Builds the state used when nothing was persisted yet.
    pub fn default_with(dictionaries: &DictionaryResource, prefers_dark_mode: bool) -> Self {
        Self {
            sound: true,
            dictionaries: dictionaries.all(),
            selected_dictionary: dictionaries.first().clone(),
            pronunciation: Pronunciation::Us,
            selected_chapter: 0,
            random: false,
            loop_word: false,
            phonetic: true,
            dark_mode: prefers_dark_mode,
            sound_loop: false,
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_wraps_after_last_preset() {
        assert_eq!(next_opacity(1.0), 0.1);
        assert_eq!(next_opacity(0.25), 0.5);
    }

    #[test]
    fn opacity_returns_to_start_after_full_cycle() {
        for start in OPACITY_PRESETS {
            let mut value = start;
            for _ in 0..OPACITY_PRESETS.len() {
                value = next_opacity(value);
            }
            assert_eq!(value, start);
        }
    }

    #[test]
    fn unknown_opacity_restarts_cycle() {
        assert_eq!(next_opacity(0.75), 0.1);
        assert_eq!(next_opacity(f64::NAN), 0.1);
    }

    #[test]
    fn pronunciation_uses_string_or_false() {
        assert_eq!(serde_json::to_string(&Pronunciation::Uk).unwrap(), r#""uk""#);
        assert_eq!(serde_json::to_string(&Pronunciation::Disabled).unwrap(), "false");
        assert_eq!(
            serde_json::from_str::<Pronunciation>("false").unwrap(),
            Pronunciation::Disabled
        );
        assert_eq!(
            serde_json::from_str::<Pronunciation>(r#""jap""#).unwrap(),
            Pronunciation::Jap
        );
    }

    #[test]
    fn pronunciation_rejects_unknown_values() {
        assert!(serde_json::from_str::<Pronunciation>("true").is_err());
        assert!(serde_json::from_str::<Pronunciation>(r#""fr""#).is_err());
        assert!(serde_json::from_str::<Pronunciation>("3").is_err());
    }

    #[test]
    fn default_state_matches_documented_values() {
        let resource = DictionaryResource::builtin();
        let state = AppState::default_with(&resource, true);

        assert!(state.sound);
        assert!(Arc::ptr_eq(&state.dictionaries, &resource.all()));
        assert_eq!(&state.selected_dictionary, resource.first());
        assert_eq!(state.pronunciation, Pronunciation::Us);
        assert_eq!(state.selected_chapter, 0);
        assert!(!state.random);
        assert!(!state.loop_word);
        assert!(state.phonetic);
        assert!(state.dark_mode);
        assert!(!state.sound_loop);
        assert_eq!(state.opacity, 1.0);
    }
}
