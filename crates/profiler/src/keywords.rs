//! Keyword lists searched over title + overview.

use crate::types::ThematicTag;

pub const EPIC_TERMS: &[&str] = &[
    "epic", "empire", "kingdom", "king", "queen", "throne", "battle", "war", "legend", "dynasty",
    "warrior", "saga", "emperor", "prince", "princess", "ancient", "army", "conquest",
];

pub const MASS_HERO_TERMS: &[&str] = &[
    "hero", "gangster", "don", "rebel", "mafia", "vigilante", "smuggler", "underworld", "rowdy",
    "messiah", "savior", "saviour", "fight", "mass",
];

pub const PATRIOTIC_TERMS: &[&str] = &[
    "nation", "patriot", "freedom", "independence", "soldier", "motherland", "colonial",
    "revolution", "border", "martyr",
];

pub const REVENGE_TERMS: &[&str] = &[
    "revenge", "vengeance", "avenge", "retribution", "vendetta", "payback", "retaliation",
];

pub const THEMATIC_TERMS: &[(&str, ThematicTag)] = &[
    ("god", ThematicTag::Mythology),
    ("demon", ThematicTag::Mythology),
    ("myth", ThematicTag::Mythology),
    ("mythology", ThematicTag::Mythology),
    ("deity", ThematicTag::Mythology),
    ("family", ThematicTag::Family),
    ("father", ThematicTag::Family),
    ("mother", ThematicTag::Family),
    ("brother", ThematicTag::Family),
    ("sister", ThematicTag::Family),
    ("daughter", ThematicTag::Family),
    ("son", ThematicTag::Family),
    ("friend", ThematicTag::Friendship),
    ("friendship", ThematicTag::Friendship),
    ("love", ThematicTag::Romance),
    ("romance", ThematicTag::Romance),
    ("lover", ThematicTag::Romance),
    ("crime", ThematicTag::Crime),
    ("murder", ThematicTag::Crime),
    ("police", ThematicTag::Crime),
    ("cop", ThematicTag::Crime),
    ("drug", ThematicTag::Crime),
    ("heist", ThematicTag::Heist),
    ("robbery", ThematicTag::Heist),
    ("survive", ThematicTag::Survival),
    ("survival", ThematicTag::Survival),
    ("stranded", ThematicTag::Survival),
    ("zombie", ThematicTag::Survival),
    ("teen", ThematicTag::ComingOfAge),
    ("college", ThematicTag::ComingOfAge),
    ("school", ThematicTag::ComingOfAge),
    ("politics", ThematicTag::Politics),
    ("politician", ThematicTag::Politics),
    ("election", ThematicTag::Politics),
    ("minister", ThematicTag::Politics),
    ("justice", ThematicTag::Justice),
    ("corruption", ThematicTag::Justice),
    ("court", ThematicTag::Justice),
    ("lawyer", ThematicTag::Justice),
    ("ghost", ThematicTag::Supernatural),
    ("haunted", ThematicTag::Supernatural),
    ("spirit", ThematicTag::Supernatural),
    ("curse", ThematicTag::Supernatural),
    ("supernatural", ThematicTag::Supernatural),
];

const SUFFIXES: &[&str] = &["s", "es", "ed", "ing", "er", "ers", "ful"];

/// Lower-cased words of a text
pub fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Whether `word` is `term` or `term` plus a common suffix
pub fn word_matches(word: &str, term: &str) -> bool {
    match word.strip_prefix(term) {
        Some("") => return true,
        Some(rest) if SUFFIXES.contains(&rest) => return true,
        // "avenge" + "d"
        Some("d") if term.ends_with('e') => return true,
        _ => {}
    }
    // "survive" -> "surviving"
    term.strip_suffix('e')
        .and_then(|stem| word.strip_prefix(stem))
        .is_some_and(|rest| rest == "ing")
}

/// Number of distinct terms from `terms` present in `words`
pub fn count_hits(words: &[String], terms: &[&str]) -> usize {
    terms
        .iter()
        .filter(|term| words.iter().any(|w| word_matches(w, term)))
        .count()
}

/// Thematic tags in the order their words appear
pub fn thematic_tags(words: &[String]) -> Vec<ThematicTag> {
    let mut tags = Vec::new();
    for word in words {
        for (term, tag) in THEMATIC_TERMS {
            if word_matches(word, term) && !tags.contains(tag) {
                tags.push(*tag);
            }
        }
    }
    tags
}
