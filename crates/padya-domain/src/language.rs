//! Language universe resolution.
//!
//! The language universe of a work is the full set of language codes its
//! verses must track, independent of which languages have content yet. It is
//! the union of the fixed required set, the work's declared languages, the
//! canonical language, and any language already present in loaded verse data
//! (legacy verses may carry languages outside the current required set; those
//! must never be dropped on load or re-save).

/// Languages every verse tracks regardless of the work's declaration.
pub const REQUIRED_LANGS: [&str; 5] = ["bn", "en", "or", "hi", "as"];

/// Canonical language assumed when a work does not declare one.
pub const DEFAULT_CANONICAL_LANG: &str = "bn";

/// Compute the ordered language universe.
///
/// Order: canonical first, then the required set, then work-declared
/// languages, then languages already present as keys in loaded verse data.
/// Duplicates keep their first position, so the result is stable under
/// re-resolution with the same inputs.
pub fn resolve_universe<'a, W, E>(canonical: &str, work_langs: W, existing_keys: E) -> Vec<String>
where
    W: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = &'a str>,
{
    let mut universe: Vec<String> = Vec::new();
    let mut push = |lang: &str| {
        if !lang.is_empty() && !universe.iter().any(|known| known == lang) {
            universe.push(lang.to_string());
        }
    };

    push(canonical);
    for lang in REQUIRED_LANGS {
        push(lang);
    }
    for lang in work_langs {
        push(lang);
    }
    for lang in existing_keys {
        push(lang);
    }
    universe
}

/// Languages whose editors are visible for a loaded draft.
///
/// The preferred language and English are always shown; any universe language
/// with non-empty text is auto-revealed so existing content is never hidden;
/// manual expansions are honored. Hiding an expanded language only removes its
/// editor, never its data, so this is a pure projection of the inputs.
pub fn visible_languages<'a>(
    universe: &[String],
    preferred: &str,
    texts: impl Fn(&str) -> Option<&'a str>,
    manually_expanded: &[String],
) -> Vec<String> {
    let mut visible: Vec<String> = Vec::new();
    let mut push = |lang: &str| {
        if !visible.iter().any(|known| known == lang) {
            visible.push(lang.to_string());
        }
    };

    push(preferred);
    push("en");
    for lang in universe {
        let has_content = texts(lang).map(|t| !t.trim().is_empty()).unwrap_or(false);
        if has_content || manually_expanded.iter().any(|m| m == lang) {
            push(lang);
        }
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_orders_canonical_first() {
        let universe = resolve_universe("sa", ["bn", "sa"], []);
        assert_eq!(universe, vec!["sa", "bn", "en", "or", "hi", "as"]);
    }

    #[test]
    fn universe_keeps_legacy_record_languages() {
        let universe = resolve_universe("bn", ["bn", "en"], ["ta", "bn"]);
        assert!(universe.contains(&"ta".to_string()));
        assert_eq!(universe.len(), 6);
    }

    #[test]
    fn universe_is_idempotent() {
        let first = resolve_universe("bn", ["or", "kn"], ["te"]);
        let again = resolve_universe(
            "bn",
            ["or", "kn"],
            first.iter().map(String::as_str).collect::<Vec<_>>(),
        );
        assert_eq!(first, again);
    }

    #[test]
    fn visible_shows_preferred_english_and_content() {
        let universe: Vec<String> = ["bn", "en", "or", "hi", "as"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let visible = visible_languages(
            &universe,
            "bn",
            |lang| match lang {
                "hi" => Some("पद"),
                "or" => Some("   "),
                _ => Some(""),
            },
            &[],
        );
        assert_eq!(visible, vec!["bn", "en", "hi"]);
    }

    #[test]
    fn visible_honors_manual_expansion() {
        let universe: Vec<String> = ["bn", "en", "as"].iter().map(|s| s.to_string()).collect();
        let expanded = vec!["as".to_string()];
        let visible = visible_languages(&universe, "bn", |_| Some(""), &expanded);
        assert_eq!(visible, vec!["bn", "en", "as"]);
    }
}
