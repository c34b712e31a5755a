//! Mirrors state fields into other systems of record.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, PoisonError},
};

/// Class toggled on the document root while dark mode is enabled.
pub const DARK_CLASS: &str = "dark";

/// Root element of the presentation layer, styled through class flags.
pub trait DocumentRoot: Send + Sync {
    fn set_class(&self, class: &str, enabled: bool);
}

/// In-process document root keeping its classes in a shared set.
#[derive(Debug, Clone, Default)]
pub struct ClassList {
    classes: Arc<Mutex<BTreeSet<String>>>,
}

impl ClassList {
    pub fn contains(&self, class: &str) -> bool {
        self.classes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(class)
    }
}

impl DocumentRoot for ClassList {
    fn set_class(&self, class: &str, enabled: bool) {
        let mut classes = self.classes.lock().unwrap_or_else(PoisonError::into_inner);
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
        log::debug!("Document root classes: {classes:?}");
    }
}

pub(crate) fn sync_dark_mode(root: &dyn DocumentRoot, enabled: bool) {
    root.set_class(DARK_CLASS, enabled);
}
