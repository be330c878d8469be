// Stable document ids for seeded places.
// Re-running the seed with the same (city, name) pairs lands on the same
// documents, so merge-writes replace instead of duplicating.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const NAME_SLUG_MAX: usize = 40;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern should compile"));

/// 32-bit FNV-1a over the UTF-16 code units of `value`.
pub fn hash_string(value: &str) -> u32 {
    value.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Lowercases and strips diacritics. Letters without a decomposition get
/// explicit substitutions.
pub fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .replace('ø', "o")
        .replace('æ', "ae")
        .replace('å', "a")
}

pub fn slugify(value: &str) -> String {
    let normalized = normalize(value);
    NON_ALPHANUMERIC
        .replace_all(&normalized, "-")
        .trim_matches('-')
        .to_string()
}

/// `seed-{city slug}-{hash hex}-{name slug, max 40 chars}`
pub fn document_id(city: &str, name: &str) -> String {
    let hash = hash_string(&format!("{}-{}", city, name));
    let name_slug: String = slugify(name).chars().take(NAME_SLUG_MAX).collect();
    format!("seed-{}-{:x}-{}", slugify(city), hash, name_slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_string_matches_fnv1a() {
        assert_eq!(hash_string(""), 2_166_136_261);
        assert_eq!(hash_string("a"), 0xe40c292c);
        assert_eq!(hash_string("foobar"), 0xbf9cf968);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Malmö"), "malmo");
        assert_eq!(slugify("  Nørrebro Coffee Corner "), "norrebro-coffee-corner");
        assert_eq!(slugify("Refshaleøen"), "refshaleoen");
        assert_eq!(slugify("Kiosk/grill & Co."), "kiosk-grill-co");
        assert_eq!(slugify("Smørrebrød Æblegård Å"), "smorrebrod-aeblegard-a");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_document_id_is_deterministic() {
        let first = document_id("Malmö", "Möllan Morning Café");
        let second = document_id("Malmö", "Möllan Morning Café");
        assert_eq!(first, second);
        assert!(first.starts_with("seed-malmo-"));
        assert!(first.ends_with("-mollan-morning-cafe"));
    }

    #[test]
    fn test_document_id_distinguishes_pairs() {
        let pairs = [
            ("Copenhagen", "Nyhavn Afterwork Pub"),
            ("Malmö", "Nyhavn Afterwork Pub"),
            ("Copenhagen", "Nyhavn Afterwork Pub 2"),
            ("Sao Paulo", "Centro Lunch Bar"),
        ];
        let ids: std::collections::HashSet<_> =
            pairs.iter().map(|(c, n)| document_id(c, n)).collect();
        assert_eq!(ids.len(), pairs.len());
    }

    #[test]
    fn test_document_id_truncates_name_slug() {
        let name = "A Very Long Restaurant Name That Keeps Going And Going Forever";
        let id = document_id("Copenhagen", name);
        let hash = format!("{:x}", hash_string(&format!("Copenhagen-{}", name)));
        let prefix = format!("seed-copenhagen-{}-", hash);
        assert!(id.starts_with(&prefix));
        assert_eq!(id[prefix.len()..].len(), 40);
    }
}
