use std::collections::HashMap;

use crate::models::CuisineRule;

/// Cuisine synonyms: search terms (primary first) and provider category aliases
const CUISINE_RULES: &[(&str, CuisineRule)] = &[
    // Italian
    ("italian", CuisineRule { search_terms: &["italian", "pizza", "pasta"], categories: &["italian", "pizza", "pasta"] }),
    ("pizza", CuisineRule { search_terms: &["pizza", "italian"], categories: &["pizza", "italian"] }),
    ("pasta", CuisineRule { search_terms: &["pasta", "italian"], categories: &["pasta", "italian"] }),
    // Asian
    ("chinese", CuisineRule { search_terms: &["chinese"], categories: &["chinese"] }),
    ("japanese", CuisineRule { search_terms: &["japanese", "sushi"], categories: &["japanese", "sushi"] }),
    ("sushi", CuisineRule { search_terms: &["sushi", "japanese"], categories: &["sushi", "japanese"] }),
    ("thai", CuisineRule { search_terms: &["thai"], categories: &["thai"] }),
    ("vietnamese", CuisineRule { search_terms: &["vietnamese"], categories: &["vietnamese"] }),
    ("korean", CuisineRule { search_terms: &["korean"], categories: &["korean"] }),
    ("indian", CuisineRule { search_terms: &["indian"], categories: &["indian"] }),
    // American
    ("american", CuisineRule { search_terms: &["american", "burgers"], categories: &["american", "burgers"] }),
    ("burgers", CuisineRule { search_terms: &["burgers", "american"], categories: &["burgers", "american"] }),
    ("bbq", CuisineRule { search_terms: &["bbq", "barbecue"], categories: &["bbq", "barbecue"] }),
    // Mexican
    ("mexican", CuisineRule { search_terms: &["mexican", "tacos"], categories: &["mexican", "tacos"] }),
    ("tacos", CuisineRule { search_terms: &["tacos", "mexican"], categories: &["tacos", "mexican"] }),
    // Mediterranean
    ("mediterranean", CuisineRule { search_terms: &["mediterranean", "greek"], categories: &["mediterranean", "greek"] }),
    ("greek", CuisineRule { search_terms: &["greek", "mediterranean"], categories: &["greek", "mediterranean"] }),
    // Other
    ("seafood", CuisineRule { search_terms: &["seafood", "fish"], categories: &["seafood"] }),
    ("steakhouse", CuisineRule { search_terms: &["steakhouse", "steak"], categories: &["steakhouse"] }),
    ("vegetarian", CuisineRule { search_terms: &["vegetarian", "vegan"], categories: &["vegetarian", "vegan"] }),
    ("vegan", CuisineRule { search_terms: &["vegan", "vegetarian"], categories: &["vegan", "vegetarian"] }),
];

/// Maps free-text cuisine names to search terms and decides whether a place matches
///
/// Matching favors recall: it is a secondary filter applied after ranking.
#[derive(Debug, Clone)]
pub struct CuisineMatcher {
    rules: HashMap<&'static str, CuisineRule>,
}

impl CuisineMatcher {
    pub fn new() -> Self {
        Self {
            rules: CUISINE_RULES.iter().copied().collect(),
        }
    }

    fn rule(&self, cuisine: &str) -> Option<&CuisineRule> {
        self.rules.get(normalize(cuisine).as_str())
    }

    /// Search terms for a cuisine, primary term first
    ///
    /// Unknown cuisines map to their own lowercased name.
    pub fn search_terms(&self, cuisine: &str) -> Vec<String> {
        match self.rule(cuisine) {
            Some(rule) => rule.search_terms.iter().map(|t| t.to_string()).collect(),
            None => vec![normalize(cuisine)],
        }
    }

    pub fn primary_search_term(&self, cuisine: &str) -> String {
        self.search_terms(cuisine)
            .into_iter()
            .next()
            .unwrap_or_else(|| normalize(cuisine))
    }

    /// Provider category aliases for a cuisine, empty when unknown
    pub fn categories(&self, cuisine: &str) -> Vec<&'static str> {
        self.rule(cuisine)
            .map(|rule| rule.categories.to_vec())
            .unwrap_or_default()
    }

    /// Whether a place serves `cuisine`, judged by its name or categories
    pub fn matches<S: AsRef<str>>(&self, place_name: &str, place_categories: &[S], cuisine: &str) -> bool {
        let cuisine_lower = normalize(cuisine);
        if cuisine_lower.is_empty() {
            return false;
        }

        if place_name.to_lowercase().contains(&cuisine_lower) {
            return true;
        }

        let wanted = self.categories(cuisine);
        place_categories
            .iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .any(|c| wanted.contains(&c.as_str()))
    }
}

impl Default for CuisineMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn normalize(cuisine: &str) -> String {
    cuisine.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_cuisine_terms() {
        let matcher = CuisineMatcher::new();
        assert_eq!(matcher.search_terms("Pizza"), vec!["pizza", "italian"]);
        assert_eq!(matcher.primary_search_term(" ITALIAN "), "italian");
        assert_eq!(matcher.categories("sushi"), vec!["sushi", "japanese"]);
    }

    #[test]
    fn test_unknown_cuisine_fallback() {
        let matcher = CuisineMatcher::new();
        assert_eq!(matcher.search_terms("Ethiopian"), vec!["ethiopian"]);
        assert_eq!(matcher.primary_search_term("Ethiopian"), "ethiopian");
        assert!(matcher.categories("Ethiopian").is_empty());
    }

    #[test]
    fn test_matches_by_name() {
        let matcher = CuisineMatcher::new();
        let categories: Vec<String> = vec![];
        assert!(matcher.matches("Gluten-Free Pizza Palace", &categories, "pizza"));
        assert!(matcher.matches("Abebe Ethiopian Kitchen", &categories, "Ethiopian"));
        assert!(!matcher.matches("Mock Restaurant", &categories, "pizza"));
    }

    #[test]
    fn test_matches_by_synonym_category() {
        let matcher = CuisineMatcher::new();
        assert!(matcher.matches("Luigi's", &["Italian"], "pizza"));
        assert!(matcher.matches("Blue Fin", &["japanese", "bars"], "sushi"));
        assert!(!matcher.matches("Blue Fin", &["seafood"], "sushi"));
    }

    #[test]
    fn test_empty_cuisine_never_matches() {
        let matcher = CuisineMatcher::new();
        assert!(!matcher.matches("Anything", &["pizza"], "  "));
    }
}
