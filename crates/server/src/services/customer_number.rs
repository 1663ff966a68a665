//! Customer number generation.
//!
//! At signup every account gets a human-meaningful display code derived
//! from the declared city: a two-letter city code plus six random decimal
//! digits, e.g. `WD482913`. The code is assigned once and never
//! regenerated. The random suffix is not checked for collisions; the value
//! is a display identifier, not an authoritative key.

use rand::Rng;

/// Known city to code mappings. Keys are diacritic-stripped and lowercase.
const CITY_CODES: &[(&str, &str)] = &[
    ("warendorf", "WD"),
    ("munster", "MS"),
    ("berlin", "BE"),
    ("hamburg", "HH"),
    ("munich", "MU"),
    ("munchen", "MU"),
    ("cologne", "CO"),
    ("koln", "CO"),
    ("frankfurt", "FR"),
    ("stuttgart", "ST"),
    ("dusseldorf", "DU"),
    ("dortmund", "DO"),
    ("essen", "ES"),
    ("leipzig", "LE"),
    ("bremen", "BR"),
    ("dresden", "DR"),
    ("hannover", "HA"),
    ("nuremberg", "NU"),
    ("nurnberg", "NU"),
    ("duisburg", "DB"),
    ("bochum", "BO"),
    ("wuppertal", "WU"),
    ("bielefeld", "BI"),
    ("bonn", "BN"),
    ("mannheim", "MA"),
];

/// Derive the two-letter city code from an address or city string.
///
/// Each whitespace/comma-separated word is diacritic-stripped, lowercased
/// and looked up in the city table. If nothing matches, the first word of
/// length >= 2 supplies its first two letters, uppercased, with anything
/// that is not a letter replaced by `X`. Failing that, the code is `XX`.
#[must_use]
pub fn city_code(address: &str) -> String {
    let words: Vec<&str> = address
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .collect();

    for word in &words {
        let normalized: String = fold_diacritics(word)
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();

        if let Some((_, code)) = CITY_CODES.iter().find(|(city, _)| *city == normalized) {
            return (*code).to_string();
        }
    }

    if let Some(word) = words.iter().find(|w| w.chars().count() >= 2) {
        return fold_diacritics(word)
            .chars()
            .take(2)
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    c.to_ascii_uppercase()
                } else {
                    'X'
                }
            })
            .collect();
    }

    "XX".to_string()
}

/// Generate a full customer number: city code plus six random digits.
#[must_use]
pub fn generate(address: &str) -> String {
    let digits: u32 = rand::rng().random_range(100_000..1_000_000);
    format!("{}{digits}", city_code(address))
}

/// Replace common Latin diacritics with their base letters (`ß` becomes
/// `ss`). Anything unrecognized passes through unchanged.
fn fold_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'ä' | 'à' | 'á' | 'â' | 'ã' | 'å' => out.push('a'),
            'Ä' | 'À' | 'Á' | 'Â' | 'Ã' | 'Å' => out.push('A'),
            'ö' | 'ò' | 'ó' | 'ô' | 'õ' => out.push('o'),
            'Ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' => out.push('O'),
            'ü' | 'ù' | 'ú' | 'û' => out.push('u'),
            'Ü' | 'Ù' | 'Ú' | 'Û' => out.push('U'),
            'é' | 'è' | 'ê' | 'ë' => out.push('e'),
            'É' | 'È' | 'Ê' | 'Ë' => out.push('E'),
            'í' | 'ì' | 'î' | 'ï' => out.push('i'),
            'Í' | 'Ì' | 'Î' | 'Ï' => out.push('I'),
            'ç' => out.push('c'),
            'Ç' => out.push('C'),
            'ñ' => out.push('n'),
            'Ñ' => out.push('N'),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_city_in_full_address() {
        assert_eq!(city_code("Hauptstraße 1, 48231 Warendorf"), "WD");
    }

    #[test]
    fn test_known_cities_with_diacritics() {
        assert_eq!(city_code("München"), "MU");
        assert_eq!(city_code("Köln"), "CO");
        assert_eq!(city_code("Münster"), "MS");
        assert_eq!(city_code("Nürnberg"), "NU");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(city_code("BERLIN"), "BE");
        assert_eq!(city_code("hamburg"), "HH");
    }

    #[test]
    fn test_unknown_city_falls_back_to_first_word() {
        assert_eq!(city_code("Xyzzy"), "XY");
        assert_eq!(city_code("Xyzzy Straße 5"), "XY");
    }

    #[test]
    fn test_fallback_replaces_non_letters_with_x() {
        assert_eq!(city_code("12 Nowhere"), "XX");
        assert_eq!(city_code("a1b2"), "AX");
    }

    #[test]
    fn test_empty_and_unusable_input() {
        assert_eq!(city_code(""), "XX");
        assert_eq!(city_code("a b c"), "XX");
        assert_eq!(city_code("   ,  "), "XX");
    }

    #[test]
    fn test_generated_number_shape() {
        let number = generate("Hauptstraße 1, 48231 Warendorf");
        assert_eq!(number.len(), 8);
        assert!(number.starts_with("WD"));
        assert!(number.chars().skip(2).all(|c| c.is_ascii_digit()));
    }
}
