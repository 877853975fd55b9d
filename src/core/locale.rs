// src/core/locale.rs

use directories::ProjectDirs;
use rust_i18n::t;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

/// Languages the dashboard ships string tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Lang {
    #[default]
    Ru,
    En,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }

    /// The other language, for the single-key language switch.
    pub fn toggled(self) -> Self {
        match self {
            Lang::Ru => Lang::En,
            Lang::En => Lang::Ru,
        }
    }
}

/// Looks `key` up in `lang`'s table, returning `key` itself when absent.
pub fn resolve_in(lang: Lang, key: &str) -> String {
    let code = lang.code();
    let translated = t!(key, locale = code).to_string();
    // rust-i18n reports a miss as "<locale>.<key>".
    if translated == format!("{code}.{key}") {
        key.to_string()
    } else {
        translated
    }
}

/// File holding the persisted language code.
#[derive(Debug, Clone)]
pub struct LocaleStore {
    path: PathBuf,
}

impl LocaleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/lang` for this application, when the platform has one.
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("com", "vulnscan", env!("CARGO_PKG_NAME"))
            .map(|dirs| Self::new(dirs.config_dir().join("lang")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored language, or `None` if nothing valid is stored.
    pub fn load(&self) -> Option<Lang> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match raw.trim().parse() {
            Ok(lang) => Some(lang),
            Err(_) => {
                warn!(path = %self.path.display(), value = raw.trim(), "Ignoring unknown stored language.");
                None
            }
        }
    }

    pub fn save(&self, lang: Lang) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, lang.code())
    }
}

/// Active-language lookup with a persisted preference.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    lang: Lang,
    store: Option<LocaleStore>,
}

impl LocaleResolver {
    /// Restores the language from `store`, defaulting to Russian.
    pub fn restore(store: Option<LocaleStore>) -> Self {
        let lang = store.as_ref().and_then(LocaleStore::load).unwrap_or_default();
        debug!(lang = %lang, "Locale restored.");
        Self { lang, store }
    }

    /// A resolver that never touches disk.
    pub fn in_memory(lang: Lang) -> Self {
        Self { lang, store: None }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn resolve(&self, key: &str) -> String {
        resolve_in(self.lang, key)
    }

    /// Switches and persists the active language.
    ///
    /// A failed write is logged; the switch still takes effect for this
    /// session. Callers rebuild every locale-dependent view afterwards.
    pub fn set_locale(&mut self, lang: Lang) {
        self.lang = lang;
        if let Some(store) = &self.store {
            match store.save(lang) {
                Ok(()) => info!(lang = %lang, path = %store.path().display(), "Language preference saved."),
                Err(e) => warn!(error = %e, "Could not persist language preference."),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_resolves_to_itself() {
        for lang in [Lang::Ru, Lang::En] {
            assert_eq!(resolve_in(lang, "xyz123"), "xyz123");
        }
    }

    #[test]
    fn known_keys_differ_per_language() {
        assert_eq!(resolve_in(Lang::En, "scans"), "Scans");
        assert_eq!(resolve_in(Lang::Ru, "scans"), "Сканы");
    }

    #[test]
    fn missing_store_defaults_to_russian() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = LocaleResolver::restore(Some(LocaleStore::new(dir.path().join("lang"))));
        assert_eq!(resolver.lang(), Lang::Ru);
    }

    #[test]
    fn language_choice_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lang");

        let mut first = LocaleResolver::restore(Some(LocaleStore::new(&path)));
        first.set_locale(Lang::En);

        let second = LocaleResolver::restore(Some(LocaleStore::new(&path)));
        assert_eq!(second.lang(), Lang::En);
        assert_eq!(second.resolve("risks"), "Risks");
    }

    #[test]
    fn garbage_in_store_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang");
        fs::write(&path, "klingon").unwrap();
        assert_eq!(LocaleResolver::restore(Some(LocaleStore::new(path))).lang(), Lang::Ru);
    }
}
