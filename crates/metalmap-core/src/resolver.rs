//! Origin string to boundary feature name resolution.

/// Maps an origin string to the name used by the boundary dataset.
///
/// Names with no alias pass through trimmed but otherwise unchanged. Such
/// names may never join a feature; [`crate::aggregate::unmatched_origins`]
/// reports them.
pub fn canonical_country(origin: &str) -> String {
    let base = origin.trim();
    alias(base).unwrap_or(base).to_string()
}

fn alias(name: &str) -> Option<&'static str> {
    let canonical = match name {
        "USA" | "U.S.A." | "United States" => "United States of America",
        "UK" | "England" | "Scotland" | "Wales" | "Northern Ireland" => "United Kingdom",
        "Holland" | "The Netherlands" => "Netherlands",
        "UAE" => "United Arab Emirates",
        "Russia" | "Russian Federation" => "Russian Federation",
        "South Korea" | "Korea" => "Republic of Korea",
        "North Korea" => "Dem. Rep. Korea",
        "Czech Republic" => "Czechia",
        _ => return None,
    };
    Some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIASES: &[&str] = &[
        "USA",
        "U.S.A.",
        "United States",
        "UK",
        "England",
        "Scotland",
        "Wales",
        "Northern Ireland",
        "Holland",
        "The Netherlands",
        "UAE",
        "Russia",
        "Russian Federation",
        "South Korea",
        "Korea",
        "North Korea",
        "Czech Republic",
    ];

    #[test]
    fn test_known_aliases() {
        assert_eq!(canonical_country("USA"), "United States of America");
        assert_eq!(canonical_country("U.S.A."), "United States of America");
        assert_eq!(canonical_country("Czech Republic"), "Czechia");
        assert_eq!(canonical_country("South Korea"), "Republic of Korea");
        assert_eq!(canonical_country("North Korea"), "Dem. Rep. Korea");
        assert_eq!(canonical_country(" Holland "), "Netherlands");
    }

    #[test]
    fn test_identity_fallback() {
        assert_eq!(canonical_country("Norway"), "Norway");
        assert_eq!(canonical_country("  Brazil"), "Brazil");
        assert_eq!(canonical_country(""), "");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        for name in ALIASES.iter().chain(["Norway", "Czechia"].iter()) {
            let once = canonical_country(name);
            assert_eq!(canonical_country(&once), once, "not idempotent for {name}");
        }
    }
}
