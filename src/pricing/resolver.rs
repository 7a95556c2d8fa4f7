/// Curated free-text term → feed commodity labels, most likely label first.
///
/// Order matters: substring matches are collected in this order.
const CURATED: &[(&str, &[&str])] = &[
    ("tomato", &["Tomato"]),
    ("onion", &["Onion"]),
    ("potato", &["Potato"]),
    ("okra", &["Bhindi(Ladies Finger)"]),
    ("bhindi", &["Bhindi(Ladies Finger)"]),
    ("ladies finger", &["Bhindi(Ladies Finger)"]),
    ("brinjal", &["Brinjal"]),
    ("eggplant", &["Brinjal"]),
    ("green chilli", &["Green Chilli"]),
    ("chilli", &["Green Chilli", "Dry Chillies"]),
    ("capsicum", &["Capsicum"]),
    ("cabbage", &["Cabbage"]),
    ("cauliflower", &["Cauliflower"]),
    ("carrot", &["Carrot"]),
    ("cucumber", &["Cucumbar(Kheera)"]),
    ("bitter gourd", &["Bitter gourd"]),
    ("bottle gourd", &["Bottle gourd"]),
    ("pumpkin", &["Pumpkin"]),
    ("spinach", &["Spinach"]),
    ("coriander", &["Coriander(Leaves)"]),
    ("garlic", &["Garlic"]),
    ("ginger", &["Ginger(Green)", "Ginger(Dry)"]),
    ("peas", &["Peas Wet", "Peas(Dry)"]),
    ("radish", &["Raddish"]),
    ("beetroot", &["Beetroot"]),
    ("sweet potato", &["Sweet Potato"]),
    ("drumstick", &["Drumstick"]),
    ("lemon", &["Lemon"]),
    ("banana", &["Banana", "Banana - Green"]),
    ("apple", &["Apple"]),
    ("mango", &["Mango", "Mango (Raw-Ripe)"]),
    ("papaya", &["Papaya"]),
    ("pomegranate", &["Pomegranate"]),
    ("grapes", &["Grapes"]),
    ("orange", &["Orange"]),
    ("watermelon", &["Water Melon"]),
    ("coconut", &["Coconut", "Tender Coconut"]),
    ("wheat", &["Wheat"]),
    ("rice", &["Rice", "Paddy(Dhan)(Common)"]),
    ("paddy", &["Paddy(Dhan)(Common)", "Paddy(Dhan)(Basmati)"]),
    ("maize", &["Maize"]),
    ("corn", &["Maize"]),
    ("jowar", &["Jowar(Sorghum)"]),
    ("bajra", &["Bajra(Pearl Millet/Cumbu)"]),
    ("ragi", &["Ragi (Finger Millet)"]),
    ("chana", &["Bengal Gram(Gram)(Whole)"]),
    ("gram", &["Bengal Gram(Gram)(Whole)", "Green Gram (Moong)(Whole)"]),
    ("moong", &["Green Gram (Moong)(Whole)"]),
    ("tur", &["Arhar (Tur/Red Gram)(Whole)"]),
    ("arhar", &["Arhar (Tur/Red Gram)(Whole)"]),
    ("soybean", &["Soyabean"]),
    ("mustard", &["Mustard"]),
    ("groundnut", &["Groundnut"]),
    ("cotton", &["Cotton"]),
    ("turmeric", &["Turmeric"]),
    ("sugarcane", &["Sugarcane"]),
];

/// Maps a free-text product name to feed commodity labels to try, in order.
///
/// Resolution is exact key, then substring match in either direction, then
/// four casing variants of the input. The result is never empty.
#[derive(Debug, Clone)]
pub struct CommodityResolver {
    dictionary: Vec<(String, Vec<String>)>,
}

impl Default for CommodityResolver {
    fn default() -> Self {
        Self::with_synonyms(Vec::new())
    }
}

impl CommodityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver whose `extra` entries take precedence over the curated ones.
    pub fn with_synonyms(extra: Vec<(String, Vec<String>)>) -> Self {
        let mut dictionary: Vec<(String, Vec<String>)> = extra
            .into_iter()
            .map(|(term, names)| (normalize(&term), names))
            .filter(|(term, names)| !term.is_empty() && !names.is_empty())
            .collect();

        dictionary.extend(CURATED.iter().map(|(term, names)| {
            (
                term.to_string(),
                names.iter().map(|n| n.to_string()).collect(),
            )
        }));

        Self { dictionary }
    }

    pub fn resolve(&self, input: &str) -> Vec<String> {
        let term = normalize(input);

        if let Some(names) = self.direct_match(&term) {
            return names;
        }

        let fuzzy = self.substring_matches(&term);
        if !fuzzy.is_empty() {
            return fuzzy;
        }

        casing_variants(input.trim())
    }

    fn direct_match(&self, term: &str) -> Option<Vec<String>> {
        self.dictionary
            .iter()
            .find(|(key, _)| key == term)
            .map(|(_, names)| names.clone())
    }

    // Duplicates are kept: a label reached through two keys is tried twice.
    fn substring_matches(&self, term: &str) -> Vec<String> {
        self.dictionary
            .iter()
            .filter(|(key, _)| term.contains(key.as_str()) || key.contains(term))
            .flat_map(|(_, names)| names.iter().cloned())
            .collect()
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// As typed, Capitalized, UPPER, lower.
fn casing_variants(raw: &str) -> Vec<String> {
    let lower = raw.to_lowercase();
    let mut chars = lower.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    vec![raw.to_string(), capitalized, raw.to_uppercase(), lower]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_match() {
        let resolver = CommodityResolver::new();
        assert_eq!(resolver.resolve("tomato"), vec!["Tomato"]);
        assert_eq!(resolver.resolve("okra"), vec!["Bhindi(Ladies Finger)"]);
        // Case and padding are ignored
        assert_eq!(resolver.resolve("  OKRA "), vec!["Bhindi(Ladies Finger)"]);
    }

    #[test]
    fn test_direct_match_wins_over_substring() {
        // "green chilli" also contains "chilli", but the exact key is used alone
        let resolver = CommodityResolver::new();
        assert_eq!(resolver.resolve("Green Chilli"), vec!["Green Chilli"]);
    }

    #[test]
    fn test_substring_input_contains_key() {
        let resolver = CommodityResolver::new();
        assert_eq!(resolver.resolve("fresh tomatoes"), vec!["Tomato"]);
    }

    #[test]
    fn test_substring_key_contains_input() {
        let resolver = CommodityResolver::new();
        assert_eq!(resolver.resolve("cauli"), vec!["Cauliflower"]);
    }

    #[test]
    fn test_substring_collects_in_dictionary_order_with_duplicates() {
        let resolver = CommodityResolver::new();
        let got = resolver.resolve("red chilli and onion");
        assert_eq!(got, vec!["Onion", "Green Chilli", "Dry Chillies"]);

        let got = resolver.resolve("bhindi okra");
        assert_eq!(
            got,
            vec!["Bhindi(Ladies Finger)", "Bhindi(Ladies Finger)"]
        );
    }

    #[test]
    fn test_fallback_casing_variants() {
        let resolver = CommodityResolver::new();
        assert_eq!(
            resolver.resolve("dragonFRUIT"),
            vec!["dragonFRUIT", "Dragonfruit", "DRAGONFRUIT", "dragonfruit"]
        );
    }

    #[test]
    fn test_never_empty() {
        let resolver = CommodityResolver::new();
        for input in ["x", "zz", "quinoa", "   ", "", "a very long unknown crop"] {
            assert!(!resolver.resolve(input).is_empty(), "empty for {:?}", input);
        }
    }

    #[test]
    fn test_deterministic() {
        let resolver = CommodityResolver::new();
        for input in ["gram", "chilli", "mystery", "ri"] {
            assert_eq!(resolver.resolve(input), resolver.resolve(input));
        }
    }

    #[test]
    fn test_extra_synonyms_take_precedence() {
        let resolver = CommodityResolver::with_synonyms(vec![(
            " Tomato ".to_string(),
            vec!["Tomato".to_string(), "Cherry Tomato".to_string()],
        )]);
        assert_eq!(resolver.resolve("tomato"), vec!["Tomato", "Cherry Tomato"]);
    }

    #[test]
    fn test_blank_extra_synonyms_ignored() {
        let resolver = CommodityResolver::with_synonyms(vec![
            ("".to_string(), vec!["Anything".to_string()]),
            ("okra".to_string(), Vec::new()),
        ]);
        assert_eq!(resolver.resolve("okra"), vec!["Bhindi(Ladies Finger)"]);
    }
}
