use crate::model::Ingredient;
use lazy_static::lazy_static;
use regex::Regex;

const FRACTIONS: &str = "½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞";

lazy_static! {
    /// A leading amount (mixed numbers, fractions, decimals, unicode vulgar
    /// fractions, ranges) with an optional unit, then the ingredient name.
    static ref INGREDIENT_RE: Regex = {
        let number = format!(
            r"(?:\d+\s+\d+\s*/\s*\d+|\d+\s*/\s*\d+|\d+(?:[.,]\d+)?\s*[{FRACTIONS}]?|[{FRACTIONS}])"
        );
        let unit = r"(?:cups?|c|tablespoons?|tbsps?|tbs|tb|teaspoons?|tsps?|t|kilograms?|kg|grams?|g|milligrams?|mg|millilitres?|milliliters?|ml|centilitres?|cl|decilitres?|dl|litres?|liters?|l|ounces?|oz|fl\.?\s*oz|pounds?|lbs?|quarts?|qt|pints?|pt|gallons?|gal|pinch(?:es)?|dash(?:es)?|cloves?|cans?|tins?|slices?|pieces?|sticks?|bunch(?:es)?|handfuls?|sprigs?|packages?|pkgs?|stalks?|heads?|large|medium|small)";
        Regex::new(&format!(
            r"(?i)^\s*({number}(?:\s*(?:-|–|to)\s*{number})?(?:\s*{unit}\b\.?)?)\s+(.+?)\s*$"
        ))
        .unwrap()
    };
}

/// Split "1 1/2 cups flour" into quantity "1 1/2 cups" and name "flour".
///
/// Strings without a recognizable leading amount become the name with an
/// empty quantity.
pub fn split_ingredient(text: &str) -> Ingredient {
    let trimmed = text.trim();
    match INGREDIENT_RE.captures(trimmed) {
        Some(caps) => Ingredient::new(caps[2].trim(), caps[1].trim()),
        None => Ingredient::new(trimmed, ""),
    }
}
