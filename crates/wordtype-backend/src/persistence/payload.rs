//! Durable form of [`AppState`].
//!
//! The payload is a JSON object carrying every field except `dictionaries`.
//! Reading is lenient: missing fields take their default value and unknown
//! fields are ignored, so payloads written by older or newer builds stay
//! readable.

use serde::{Deserialize, Serialize};
use wordtype_bridge::{
    dictionary::Dictionary,
    state::{AppState, Pronunciation},
};

/// Borrowed view of the persisted fields of a state.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedState<'a> {
    sound: bool,
    selected_dictionary: &'a Dictionary,
    pronunciation: Pronunciation,
    selected_chapter: u32,
    random: bool,
    #[serde(rename = "loop")]
    loop_word: bool,
    phonetic: bool,
    dark_mode: bool,
    sound_loop: bool,
    opacity: f64,
}

impl<'a> From<&'a AppState> for PersistedState<'a> {
    fn from(state: &'a AppState) -> Self {
        Self {
            sound: state.sound,
            selected_dictionary: &state.selected_dictionary,
            pronunciation: state.pronunciation,
            selected_chapter: state.selected_chapter,
            random: state.random,
            loop_word: state.loop_word,
            phonetic: state.phonetic,
            dark_mode: state.dark_mode,
            sound_loop: state.sound_loop,
            opacity: state.opacity,
        }
    }
}

/// Only the id of a persisted dictionary matters; the record itself is
/// re-resolved against the live dictionary list.
#[derive(Debug, Deserialize)]
pub(crate) struct DictionaryRef {
    pub id: String,
}

/// Persisted fields as read back, each one optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedStatePatch {
    pub sound: Option<bool>,
    pub selected_dictionary: Option<DictionaryRef>,
    pub pronunciation: Option<Pronunciation>,
    pub selected_chapter: Option<u32>,
    pub random: Option<bool>,
    #[serde(rename = "loop")]
    pub loop_word: Option<bool>,
    pub phonetic: Option<bool>,
    pub dark_mode: Option<bool>,
    pub sound_loop: Option<bool>,
    pub opacity: Option<f64>,
}

impl PersistedStatePatch {
    /// Overwrites the fields of `state` that are present in the patch. The
    /// dictionary selection is left to the caller.
    pub fn apply_to(self, state: &mut AppState) {
        if let Some(sound) = self.sound {
            state.sound = sound;
        }
        if let Some(pronunciation) = self.pronunciation {
            state.pronunciation = pronunciation;
        }
        if let Some(chapter) = self.selected_chapter {
            state.selected_chapter = chapter;
        }
        if let Some(random) = self.random {
            state.random = random;
        }
        if let Some(loop_word) = self.loop_word {
            state.loop_word = loop_word;
        }
        if let Some(phonetic) = self.phonetic {
            state.phonetic = phonetic;
        }
        if let Some(dark_mode) = self.dark_mode {
            state.dark_mode = dark_mode;
        }
        if let Some(sound_loop) = self.sound_loop {
            state.sound_loop = sound_loop;
        }
        if let Some(opacity) = self.opacity {
            state.opacity = opacity;
        }
    }
}
