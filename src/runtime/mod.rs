//! Runtime message factories.
//!
//! A [`MessageFactory`] is constructed once per generated module load and
//! lives for the process lifetime. Every format call resolves the
//! requested locale against the factory's known tags, reusing a cached
//! resolution when the same raw tag has been requested before. The cache
//! grows monotonically with the distinct tags a session requests; nothing
//! is ever evicted.

mod resolve;

pub use resolve::lookup;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use unic_langid::LanguageIdentifier;

use crate::template::{self, Args, Message, Part};

/// The mandatory fallback root; factory construction fails without it.
const FALLBACK_LOCALE: &str = "en";

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The compiled artifact is unusable: every factory needs the
    /// fallback root locale.
    #[error("Missing locale for en")]
    MissingEnglish,
    #[error("invalid locale tag `{0}` in compiled message")]
    InvalidTag(String),
    #[error("invalid serialized message model: {0}")]
    BadModel(#[from] serde_json::Error),
}

/// A process-lifetime factory bound to one compiled message.
#[derive(Debug)]
pub struct MessageFactory {
    /// Locale models in document order; resolution ties break toward the
    /// earlier entry.
    locales: Vec<(LanguageIdentifier, Message)>,
    fallback_index: usize,
    /// Requested raw tag -> resolved locale index. Keyed by the original
    /// requested tag so repeated requests for an unmatched tag skip
    /// re-matching entirely.
    cache: Mutex<HashMap<String, usize>>,
    lookups: AtomicUsize,
}

impl MessageFactory {
    /// Build a factory from locale tags and parsed models.
    pub fn new(entries: Vec<(String, Message)>) -> Result<Self, RuntimeError> {
        let mut locales = Vec::with_capacity(entries.len());
        for (tag, message) in entries {
            let lid: LanguageIdentifier = tag
                .parse()
                .map_err(|_| RuntimeError::InvalidTag(tag.clone()))?;
            locales.push((lid, message));
        }
        let fallback_index = locales
            .iter()
            .position(|(lid, _)| lid.to_string() == FALLBACK_LOCALE)
            .ok_or(RuntimeError::MissingEnglish)?;
        Ok(Self {
            locales,
            fallback_index,
            cache: Mutex::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        })
    }

    /// Build a factory from `(tag, json-model)` pairs, the form embedded
    /// in generated modules.
    pub fn from_serialized(entries: &[(&str, &str)]) -> Result<Self, RuntimeError> {
        let mut parsed = Vec::with_capacity(entries.len());
        for (tag, json) in entries {
            let message: Message = serde_json::from_str(json)?;
            parsed.push((tag.to_string(), message));
        }
        Self::new(parsed)
    }

    /// Format to a plain string. `None` (or an empty tag) requests the
    /// fallback locale.
    pub fn to_string(&self, locale: Option<&str>, args: &Args) -> String {
        let model = self.model_for(locale);
        template::format_to_string(model, args)
    }

    /// Format to the flat parts sequence, preserving the engine's event
    /// order exactly.
    pub fn to_parts(&self, locale: Option<&str>, args: &Args) -> Vec<Part> {
        let model = self.model_for(locale);
        template::format(model, args)
    }

    /// How many fallback matches this factory has performed. A repeated
    /// request for an already-seen tag does not add to this count.
    pub fn lookups_performed(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// The factory's locale tags, document order.
    pub fn locales(&self) -> impl Iterator<Item = String> + '_ {
        self.locales.iter().map(|(lid, _)| lid.to_string())
    }

    fn model_for(&self, locale: Option<&str>) -> &Message {
        let requested = match locale {
            Some(tag) if !tag.is_empty() => tag,
            _ => FALLBACK_LOCALE,
        };
        let index = self.resolve(requested);
        let (_, message) = self
            .locales
            .get(index)
            .unwrap_or_else(|| panic!("Could not find locale for {}", requested));
        message
    }

    /// Check-then-insert under one lock; per-tag resolution runs at most
    /// once per factory.
    fn resolve(&self, requested: &str) -> usize {
        let mut cache = self.cache.lock().expect("locale cache poisoned");
        if let Some(&index) = cache.get(requested) {
            return index;
        }

        self.lookups.fetch_add(1, Ordering::Relaxed);
        let candidates: Vec<LanguageIdentifier> =
            self.locales.iter().map(|(lid, _)| lid.clone()).collect();
        let index = requested
            .parse::<LanguageIdentifier>()
            .ok()
            .and_then(|lid| resolve::lookup(&candidates, &lid))
            .unwrap_or(self.fallback_index);

        cache.insert(requested.to_string(), index);
        index
    }
}
