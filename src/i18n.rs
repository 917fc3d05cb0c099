//! Locale selection and key lookup.
//!
//! Three flat catalogs are compiled in. Lookups fall back to Uzbek, then to
//! the key itself.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

use crate::error::ApiResult;
use crate::session::{LOCALE_KEY, TokenStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    Uz,
    Ru,
    En,
}

impl Locale {
    pub const FALLBACK: Locale = Locale::Uz;
    pub const SUPPORTED: [Locale; 3] = [Locale::Uz, Locale::Ru, Locale::En];

    /// Map any language tag onto a supported locale.
    ///
    /// Matching is by prefix, case-insensitive, so `ru-RU` is Russian.
    /// Anything unrecognised, including the empty string, is Uzbek.
    pub fn normalize(tag: &str) -> Locale {
        let tag = tag.trim().to_lowercase();
        if tag.starts_with("uz") {
            Locale::Uz
        } else if tag.starts_with("ru") {
            Locale::Ru
        } else if tag.starts_with("en") {
            Locale::En
        } else {
            Locale::FALLBACK
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Uz => "uz",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    /// Read the persisted preference, storing the fallback if none is set.
    pub fn load(store: &dyn TokenStore) -> ApiResult<Locale> {
        match store.get(LOCALE_KEY) {
            Some(stored) => Ok(Locale::normalize(&stored)),
            None => {
                store.set(LOCALE_KEY, Locale::FALLBACK.code())?;
                Ok(Locale::FALLBACK)
            }
        }
    }

    pub fn save(&self, store: &dyn TokenStore) -> ApiResult<()> {
        store.set(LOCALE_KEY, self.code())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

type Strings = HashMap<String, String>;

fn parse(raw: &str) -> Strings {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::error!("bundled translation catalog is invalid: {}", e);
        HashMap::new()
    })
}

lazy_static! {
    static ref CATALOGS: HashMap<Locale, Strings> = {
        let mut catalogs = HashMap::new();
        catalogs.insert(Locale::Uz, parse(include_str!("./locale/uz.json")));
        catalogs.insert(Locale::Ru, parse(include_str!("./locale/ru.json")));
        catalogs.insert(Locale::En, parse(include_str!("./locale/en.json")));
        catalogs
    };
}

/// Translation lookup for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Catalog { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Translate `key`, falling back to Uzbek and finally to the key.
    pub fn lookup<'a>(&self, key: &'a str) -> std::borrow::Cow<'a, str> {
        let found = CATALOGS
            .get(&self.locale)
            .and_then(|strings| strings.get(key))
            .or_else(|| CATALOGS.get(&Locale::FALLBACK)?.get(key));

        match found {
            Some(text) => std::borrow::Cow::Owned(text.clone()),
            None => std::borrow::Cow::Borrowed(key),
        }
    }
}
