//! Narrow read/write views over single fields of the application state.
//!
//! The container only supports replacing the whole state, so every setter
//! copies the current state, overwrites its field and dispatches the copy.
//!
//! Accessors are memoized by the snapshot they were created from: two
//! accessors for the same field compare equal as long as no new state was
//! dispatched in between, which lets consumers skip redundant re-renders.

use std::sync::Arc;

use wordtype_bridge::{
    dictionary::{Dictionary, find_by_id},
    state::{AppState, Pronunciation, next_opacity},
};

use crate::store::{Snapshot, StateContainer};
use crate::sync::sync_dark_mode;

/// Read/write view of one field of the application state.
#[derive(Clone)]
pub struct Accessor<T> {
    container: StateContainer,
    snapshot: Snapshot,
    field: &'static str,
    get: fn(&AppState) -> T,
    set: fn(&mut AppState, T),
}

impl<T> Accessor<T> {
    /// Current value of the field, `None` while the state is not ready.
    pub fn read(&self) -> Option<T> {
        self.container.get().as_deref().map(self.get)
    }

    /// Dispatches a copy of the current state with the field set to `value`.
    /// Returns whether a state was dispatched.
    pub fn write(&self, value: T) -> bool {
        let set = self.set;
        self.container.update(move |state| {
            let mut next = state.clone();
            set(&mut next, value);
            Some(next)
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl<T> PartialEq for Accessor<T> {
    fn eq(&self, other: &Self) -> bool {
        let same_snapshot = match (&self.snapshot, &other.snapshot) {
            (Some(this), Some(other)) => Arc::ptr_eq(this, other),
            (None, None) => true,
            _ => false,
        };
        self.field == other.field && same_snapshot && self.container.same(&other.container)
    }
}

impl<T> std::fmt::Debug for Accessor<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Accessor")
            .field("field", &self.field)
            .field("ready", &self.snapshot.is_some())
            .finish()
    }
}

/// Dark mode accessor. Writing also toggles the dark class on the document
/// root.
#[derive(Debug, Clone, PartialEq)]
pub struct DarkModeAccessor {
    inner: Accessor<bool>,
}

impl DarkModeAccessor {
    pub fn read(&self) -> Option<bool> {
        self.inner.read()
    }

    /// The class is toggled under the container's write lock, so concurrent
    /// writers leave the document root in step with the state.
    pub fn write(&self, dark_mode: bool) -> bool {
        let container = &self.inner.container;
        let set = self.inner.set;
        container.update(|state| {
            let mut next = state.clone();
            set(&mut next, dark_mode);
            sync_dark_mode(container.document_root(), dark_mode);
            Some(next)
        })
    }
}

/// Window opacity accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityAccessor {
    inner: Accessor<f64>,
}

impl OpacityAccessor {
    pub fn read(&self) -> Option<f64> {
        self.inner.read()
    }

    pub fn write(&self, opacity: f64) -> bool {
        self.inner.write(opacity)
    }

    /// Moves to the next opacity preset, wrapping after the last one. A
    /// value outside of the presets restarts at the first preset. Returns the
    /// new opacity, or `None` while the state is not ready.
    pub fn advance(&self) -> Option<f64> {
        let mut advanced = None;
        self.inner.container.update(|state| {
            let opacity = next_opacity(state.opacity);
            advanced = Some(opacity);
            Some(AppState {
                opacity,
                ..state.clone()
            })
        });
        advanced
    }
}

impl StateContainer {
    fn accessor<T>(
        &self,
        field: &'static str,
        get: fn(&AppState) -> T,
        set: fn(&mut AppState, T),
    ) -> Accessor<T> {
        Accessor {
            container: self.clone(),
            snapshot: self.get(),
            field,
            get,
            set,
        }
    }

    pub fn sound(&self) -> Accessor<bool> {
        self.accessor("sound", |state| state.sound, |state, sound| state.sound = sound)
    }

    pub fn random(&self) -> Accessor<bool> {
        self.accessor("random", |state| state.random, |state, random| state.random = random)
    }

    pub fn loop_word(&self) -> Accessor<bool> {
        self.accessor(
            "loop",
            |state| state.loop_word,
            |state, loop_word| state.loop_word = loop_word,
        )
    }

    pub fn sound_loop(&self) -> Accessor<bool> {
        self.accessor(
            "soundLoop",
            |state| state.sound_loop,
            |state, sound_loop| state.sound_loop = sound_loop,
        )
    }

    pub fn phonetic(&self) -> Accessor<bool> {
        self.accessor(
            "phonetic",
            |state| state.phonetic,
            |state, phonetic| state.phonetic = phonetic,
        )
    }

    pub fn pronunciation(&self) -> Accessor<Pronunciation> {
        self.accessor(
            "pronunciation",
            |state| state.pronunciation,
            |state, pronunciation| state.pronunciation = pronunciation,
        )
    }

    pub fn selected_chapter(&self) -> Accessor<u32> {
        self.accessor(
            "selectedChapter",
            |state| state.selected_chapter,
            |state, chapter| state.selected_chapter = chapter,
        )
    }

    pub fn dark_mode(&self) -> DarkModeAccessor {
        DarkModeAccessor {
            inner: self.accessor(
                "darkMode",
                |state| state.dark_mode,
                |state, dark_mode| state.dark_mode = dark_mode,
            ),
        }
    }

    pub fn opacity(&self) -> OpacityAccessor {
        OpacityAccessor {
            inner: self.accessor(
                "opacity",
                |state| state.opacity,
                |state, opacity| state.opacity = opacity,
            ),
        }
    }

    /// The whole state, read-only. `None` while the state is not ready.
    pub fn app_state(&self) -> Option<Arc<AppState>> {
        self.get()
    }

    /// All available dictionaries.
    pub fn dictionaries(&self) -> Option<Arc<[Dictionary]>> {
        self.get().map(|state| Arc::clone(&state.dictionaries))
    }

    pub fn selected_dictionary(&self) -> Option<Dictionary> {
        self.get().map(|state| state.selected_dictionary.clone())
    }

    /// Selects the dictionary with the given id and resets the chapter, in a
    /// single dispatch. An unknown id is ignored.
    pub fn select_dictionary(&self, id: &str) -> bool {
        self.update(|state| {
            let Some(dictionary) = find_by_id(&state.dictionaries, id) else {
                log::debug!("Dictionary {id:?} not found, ignoring selection");
                return None;
            };
            Some(AppState {
                selected_dictionary: dictionary.clone(),
                selected_chapter: 0,
                ..state.clone()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use wordtype_bridge::{MessageToBackend, dictionary::DictionaryResource};

    use super::*;
    use crate::sync::DARK_CLASS;
    use crate::{slow_test_container, test_container};

    fn ready_container() -> (
        StateContainer,
        tokio::sync::mpsc::UnboundedReceiver<MessageToBackend>,
        crate::sync::ClassList,
    ) {
        let (container, rx, classes) = test_container();
        container.hydrate(AppState::default_with(&DictionaryResource::builtin(), false));
        (container, rx, classes)
    }

    #[test]
    fn reads_are_absent_until_ready() {
        let (container, _rx, _) = test_container();

        assert_eq!(container.sound().read(), None);
        assert_eq!(container.opacity().read(), None);
        assert_eq!(container.opacity().advance(), None);
        assert!(container.dictionaries().is_none());
        assert!(!container.phonetic().write(false));
    }

    #[test]
    fn write_changes_only_its_field() {
        let (container, _rx, _) = ready_container();
        let before = container.get().unwrap();

        assert!(container.random().write(true));

        let after = container.get().unwrap();
        assert_eq!(
            *after,
            AppState {
                random: true,
                ..(*before).clone()
            }
        );
        assert!(!before.random);
    }

    #[test]
    fn every_toggle_reads_back_its_write() {
        let (container, _rx, _) = ready_container();

        container.sound().write(false);
        container.loop_word().write(true);
        container.sound_loop().write(true);
        container.phonetic().write(false);
        container.pronunciation().write(Pronunciation::Disabled);
        container.selected_chapter().write(4);

        assert_eq!(container.sound().read(), Some(false));
        assert_eq!(container.loop_word().read(), Some(true));
        assert_eq!(container.sound_loop().read(), Some(true));
        assert_eq!(container.phonetic().read(), Some(false));
        assert_eq!(
            container.pronunciation().read(),
            Some(Pronunciation::Disabled)
        );
        assert_eq!(container.selected_chapter().read(), Some(4));
    }

    #[test]
    fn accessors_are_stable_until_next_dispatch() {
        let (container, _rx, _) = ready_container();
        let first = container.sound();

        assert_eq!(first, container.sound());
        assert_ne!(first.field(), container.random().field());

        container.sound().write(false);

        assert_ne!(first, container.sound());
        assert_eq!(container.sound(), container.sound());
    }

    #[test]
    fn selecting_dictionary_resets_chapter_in_one_dispatch() {
        let (container, mut rx, _) = ready_container();
        container.selected_chapter().write(9);
        while rx.try_recv().is_ok() {}

        assert!(container.select_dictionary("toefl"));

        let state = container.get().unwrap();
        assert_eq!(state.selected_dictionary.id, "toefl");
        assert_eq!(state.selected_chapter, 0);
        let saves = std::iter::from_fn(|| rx.try_recv().ok()).count();
        assert_eq!(saves, 1);
    }

    #[test]
    fn selecting_unknown_dictionary_is_a_no_op() {
        let (container, mut rx, _) = ready_container();
        container.selected_chapter().write(3);
        let before = container.get().unwrap();
        let mut receiver = container.subscribe();
        receiver.borrow_and_update();
        while rx.try_recv().is_ok() {}

        assert!(!container.select_dictionary("missing"));

        assert!(Arc::ptr_eq(&before, &container.get().unwrap()));
        assert!(!receiver.has_changed().unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn opacity_cycles_through_presets() {
        let (container, _rx, _) = ready_container();

        container.opacity().write(0.25);
        assert_eq!(container.opacity().read(), Some(0.25));
        assert_eq!(container.opacity().advance(), Some(0.5));
        assert_eq!(container.opacity().advance(), Some(1.0));
        assert_eq!(container.opacity().advance(), Some(0.1));
        assert_eq!(container.opacity().read(), Some(0.1));
    }

    #[test]
    fn opacity_outside_presets_restarts_cycle() {
        let (container, _rx, _) = ready_container();

        container.opacity().write(0.8);

        assert_eq!(container.opacity().advance(), Some(0.1));
    }

    #[test]
    fn dark_mode_write_toggles_document_class() {
        let (container, _rx, classes) = ready_container();

        assert!(container.dark_mode().write(true));
        assert!(classes.contains(DARK_CLASS));
        assert_eq!(container.dark_mode().read(), Some(true));

        assert!(container.dark_mode().write(false));
        assert!(!classes.contains(DARK_CLASS));
    }

    #[test]
    fn concurrent_dark_mode_writes_keep_document_root_in_step() {
        let (container, _rx, classes) = slow_test_container(Duration::from_millis(200));
        container.hydrate(AppState::default_with(&DictionaryResource::builtin(), false));

        let writer = {
            let container = container.clone();
            thread::spawn(move || container.dark_mode().write(true))
        };
        thread::sleep(Duration::from_millis(50));
        container.dark_mode().write(false);
        assert!(writer.join().unwrap());

        let dark_mode = container.dark_mode().read().unwrap();
        assert_eq!(classes.contains(DARK_CLASS), dark_mode);
    }

    #[test]
    fn app_state_is_the_current_snapshot() {
        let (container, _rx, _) = test_container();
        assert!(container.app_state().is_none());

        container.hydrate(AppState::default_with(&DictionaryResource::builtin(), false));
        let before = container.app_state().unwrap();
        assert!(Arc::ptr_eq(&before, &container.get().unwrap()));

        container.sound().write(false);
        let after = container.app_state().unwrap();
        assert!(!after.sound);
        assert!(before.sound);
    }

    #[test]
    fn dictionaries_are_the_live_list() {
        let (container, _rx, _) = ready_container();
        let state = container.get().unwrap();

        assert!(Arc::ptr_eq(
            &container.dictionaries().unwrap(),
            &state.dictionaries
        ));
        assert_eq!(container.selected_dictionary().unwrap().id, "cet4");
    }
}
