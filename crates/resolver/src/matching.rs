//! Title normalization and similarity helpers.
//!
//! Shared by candidate scoring and confidence scoring so that both see the
//! same notion of "the same title".

use std::collections::HashSet;

const LEADING_ARTICLES: &[&str] = &["the", "a", "an"];

/// Lower-cased alphanumeric tokens with a leading article removed
pub fn title_tokens(title: &str) -> Vec<String> {
    let mut tokens: Vec<String> = title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect();

    if tokens.len() > 1 && LEADING_ARTICLES.contains(&tokens[0].as_str()) {
        tokens.remove(0);
    }
    tokens
}

/// Article-stripped, lower-cased, punctuation-free title
pub fn normalize_title(title: &str) -> String {
    title_tokens(title).join(" ")
}

/// The part of a title before a subtitle separator
///
/// "Baahubali: The Beginning" -> "Baahubali"
pub fn main_title(title: &str) -> &str {
    let cut = [":", " - ", " – ", " — "]
        .iter()
        .filter_map(|sep| title.find(sep))
        .min();
    match cut {
        Some(idx) if idx > 0 => title[..idx].trim(),
        _ => title.trim(),
    }
}

/// Token-set Jaccard similarity in `[0, 1]`
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a: HashSet<String> = title_tokens(a).into_iter().collect();
    let b: HashSet<String> = title_tokens(b).into_iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Coarse similarity tier between a query and a catalog title
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TitleTier {
    None,
    WeakFuzzy,
    Fuzzy,
    Substring,
    Prefix,
    Exact,
}

impl TitleTier {
    /// Points contributed to the candidate score
    pub fn points(&self) -> u32 {
        match self {
            TitleTier::Exact => 100,
            TitleTier::Prefix => 80,
            TitleTier::Substring => 60,
            TitleTier::Fuzzy => 40,
            TitleTier::WeakFuzzy => 20,
            TitleTier::None => 0,
        }
    }

    /// Classify how closely `candidate` matches `query`
    pub fn classify(query: &str, candidate: &str) -> Self {
        if query.trim().eq_ignore_ascii_case(candidate.trim())
            || query.trim().to_lowercase() == candidate.trim().to_lowercase()
        {
            return TitleTier::Exact;
        }

        let q = normalize_title(query);
        let c = normalize_title(candidate);
        if q.is_empty() || c.is_empty() {
            return TitleTier::None;
        }
        if q == c || c.starts_with(&format!("{} ", q)) || normalize_title(main_title(candidate)) == q {
            return TitleTier::Prefix;
        }
        if c.contains(&q) {
            return TitleTier::Substring;
        }

        let similarity = jaccard_similarity(query, candidate);
        if similarity >= 0.5 {
            TitleTier::Fuzzy
        } else if similarity > 0.0 {
            TitleTier::WeakFuzzy
        } else {
            TitleTier::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_articles_and_punctuation() {
        assert_eq!(normalize_title("The Dark Knight"), "dark knight");
        assert_eq!(normalize_title("K.G.F: Chapter 1"), "k g f chapter 1");
        // A lone article is the whole title
        assert_eq!(normalize_title("The"), "the");
    }

    #[test]
    fn test_main_title() {
        assert_eq!(main_title("Baahubali: The Beginning"), "Baahubali");
        assert_eq!(main_title("Pushpa - The Rise"), "Pushpa");
        assert_eq!(main_title("Drishyam"), "Drishyam");
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard_similarity("Dark Knight", "The Dark Knight"), 1.0);
        assert!((jaccard_similarity("Dark Knight", "Dark Knight Rises") - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard_similarity("Eega", "Vikram"), 0.0);
    }

    #[test]
    fn test_title_tiers() {
        assert_eq!(TitleTier::classify("rrr", "RRR"), TitleTier::Exact);
        assert_eq!(TitleTier::classify("Baahubali", "Baahubali: The Beginning"), TitleTier::Prefix);
        assert_eq!(TitleTier::classify("Knight", "The Dark Knight"), TitleTier::Substring);
        assert_eq!(TitleTier::classify("Knight Dark", "The Dark Knight"), TitleTier::Fuzzy);
        assert_eq!(TitleTier::classify("Dark City", "The Dark Knight Rises"), TitleTier::WeakFuzzy);
        assert_eq!(TitleTier::classify("Eega", "Vikram"), TitleTier::None);
        assert!(TitleTier::Exact.points() > TitleTier::Prefix.points());
    }
}
