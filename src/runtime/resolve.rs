//! BCP-47 lookup-style fallback matching.
//!
//! The requested tag is progressively generalized (variants, then region,
//! then script dropped) and each candidate list is scanned in document
//! order, so `fr-CA` falls back to `fr` and the first matching definition
//! wins.

use unic_langid::LanguageIdentifier;

/// Find the best-matching candidate for `requested`, returning its index.
pub fn lookup(candidates: &[LanguageIdentifier], requested: &LanguageIdentifier) -> Option<usize> {
    for probe in fallback_chain(requested) {
        if let Some(index) = candidates.iter().position(|c| *c == probe) {
            return Some(index);
        }
    }
    None
}

/// The requested tag followed by each generalization of it, most specific
/// first.
fn fallback_chain(requested: &LanguageIdentifier) -> Vec<LanguageIdentifier> {
    let mut chain = vec![requested.clone()];
    let mut current = requested.clone();

    if current.variants().count() > 0 {
        current.clear_variants();
        chain.push(current.clone());
    }
    if current.region.is_some() {
        current.region = None;
        chain.push(current.clone());
    }
    if current.script.is_some() {
        current.script = None;
        chain.push(current.clone());
    }
    chain
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tags(raw: &[&str]) -> Vec<LanguageIdentifier> {
        raw.iter().map(|t| t.parse().unwrap()).collect()
    }

    fn tag(raw: &str) -> LanguageIdentifier {
        raw.parse().unwrap()
    }

    #[test]
    fn test_exact_match() {
        let candidates = tags(&["en", "fr"]);
        assert_eq!(lookup(&candidates, &tag("fr")), Some(1));
    }

    #[test]
    fn test_regional_fallback() {
        let candidates = tags(&["en", "fr"]);
        assert_eq!(lookup(&candidates, &tag("fr-CA")), Some(1));
    }

    #[test]
    fn test_script_and_region_fallback() {
        let candidates = tags(&["zh"]);
        assert_eq!(lookup(&candidates, &tag("zh-Hant-TW")), Some(0));
    }

    #[test]
    fn test_no_match() {
        let candidates = tags(&["en", "fr"]);
        assert_eq!(lookup(&candidates, &tag("de")), None);
    }

    #[test]
    fn test_specific_candidate_preferred() {
        let candidates = tags(&["fr", "fr-CA"]);
        assert_eq!(lookup(&candidates, &tag("fr-CA")), Some(1));
    }

    #[test]
    fn test_first_candidate_wins_ties() {
        // Both candidates normalize distinct; requested matches only one.
        let candidates = tags(&["en-GB", "en"]);
        assert_eq!(lookup(&candidates, &tag("en-AU")), Some(1));
    }
}
