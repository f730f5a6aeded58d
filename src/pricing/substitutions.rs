//! Search-term substitutions for store lookups.
//!
//! Generic names like "sugar" match unrelated products ("no sugar cola"),
//! so common ingredients are rewritten to a more specific product search.

use std::collections::HashMap;
use std::sync::LazyLock;

static SUBSTITUTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Baking
    map.insert("sugar", "white sugar");
    map.insert("flour", "plain flour");
    map.insert("cacao", "cacao powder");
    map.insert("cocoa", "cocoa powder");
    map.insert("vanilla", "vanilla extract");
    map.insert("honey", "pure honey");
    map.insert("dark chocolate", "old gold");

    // Dairy and eggs
    map.insert("milk", "full cream milk");
    map.insert("butter", "unsalted butter");
    map.insert("egg", "large free range eggs");
    map.insert("eggs", "large free range eggs");
    map.insert("sour cream", "light sour cream");
    map.insert("cream cheese", "cream cheese spread");

    // Meat
    map.insert("beef", "beef diced");
    map.insert("lamb", "lamb leg");
    map.insert("mince", "lean mince");
    map.insert("minced beef", "lean mince");
    map.insert("bacon", "middle bacon");
    map.insert("chicken", "chicken breast fillets");

    // Oils, vinegars, seasoning
    map.insert("oil", "blended vegetable oil");
    map.insert("vegetable oil", "blended vegetable oil");
    map.insert("olive oil", "australian extra virgin olive oil");
    map.insert("vinegar", "white vinegar");
    map.insert("salt", "table salt");
    map.insert("sea salt", "rock salt");
    map.insert("pepper", "ground black pepper");
    map.insert("bay leaf", "bay leaves");
    map.insert("rosemary", "hoyts rosemary");

    // Fruit and vegetables
    map.insert("lime", "limes");
    map.insert("lemon", "lemons");
    map.insert("onion", "onions");
    map.insert("banana", "bananas");
    map.insert("garlic", "garlic loose");
    map.insert("ginger", "ginger loose");
    map.insert("shallots", "spring onion");
    map.insert("challots", "spring onion");
    map.insert("tomato puree", "passata");

    // Everything else
    map.insert("red wine", "shiraz");
    map.insert("peanuts", "salted peanuts");
    map.insert("bread", "white bread");

    map
});

/// Store search term for an ingredient name.
///
/// Lookup is case-insensitive; names without a substitution are returned
/// trimmed but otherwise unchanged.
pub fn search_term(ingredient_name: &str) -> String {
    let trimmed = ingredient_name.trim();
    SUBSTITUTIONS
        .get(trimmed.to_lowercase().as_str())
        .map(|term| term.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Number of substitution entries
pub fn substitution_count() -> usize {
    SUBSTITUTIONS.len()
}
