//! Locale-aware number formatting for tick labels.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Unknown tags fall back to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Fewest decimals that show every multiple of `unit` exactly.
pub fn decimals_for(unit: f64) -> usize {
    if !unit.is_finite() || unit <= 0.0 {
        return 0;
    }
    (0..=10)
        .find(|d| {
            let scaled = unit * 10f64.powi(*d as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
        })
        .unwrap_or(10)
}

/// Format `value` with `decimals` fraction digits and the locale's grouping.
pub fn format_number(value: f64, decimals: usize, locale_tag: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let (locale, sep) = map_locale(locale_tag);
    let plain = format!("{:.*}", decimals, value.abs());
    let (int_part, frac) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
    let mut out = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(locale),
        Err(_) => int_part.to_string(),
    };
    if !frac.is_empty() {
        out.push(sep);
        out.push_str(frac);
    }
    let is_zero = plain.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_per_locale() {
        assert_eq!(format_number(30000.0, 0, "en"), "30,000");
        assert_eq!(format_number(30000.0, 0, "de"), "30.000");
        assert_eq!(format_number(-1234.5, 1, "de"), "-1.234,5");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(format_number(-0.0001, 2, "en"), "0.00");
    }

    #[test]
    fn decimals_follow_unit() {
        assert_eq!(decimals_for(5.0), 0);
        assert_eq!(decimals_for(0.25), 2);
        assert_eq!(decimals_for(0.1), 1);
    }
}
