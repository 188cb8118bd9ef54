//! Static city table. Names are matched case-insensitively; there is no geocoding.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Cities that can be added by name.
pub const SUPPORTED_CITIES: [City; 10] = [
    City { name: "Birmingham", lat: 52.4862, lon: -1.8904 },
    City { name: "Leeds", lat: 53.8008, lon: -1.5491 },
    City { name: "Glasgow", lat: 55.8642, lon: -4.2518 },
    City { name: "Liverpool", lat: 53.4084, lon: -2.9916 },
    City { name: "Edinburgh", lat: 55.9533, lon: -3.1883 },
    City { name: "Bristol", lat: 51.4545, lon: -2.5879 },
    City { name: "Cardiff", lat: 51.4816, lon: -3.1791 },
    City { name: "Brighton", lat: 50.8225, lon: -0.1372 },
    City { name: "Oxford", lat: 51.7520, lon: -1.2577 },
    City { name: "Cambridge", lat: 52.2053, lon: 0.1218 },
];

/// Locations tracked on startup. Not addable by name.
pub const DEFAULT_LOCATIONS: [City; 2] = [
    City { name: "London", lat: 51.5074, lon: -0.1278 },
    City { name: "Manchester", lat: 53.4808, lon: -2.2426 },
];

pub fn lookup(name: &str) -> Option<&'static City> {
    let name = name.trim();
    SUPPORTED_CITIES
        .iter()
        .find(|city| city.name.eq_ignore_ascii_case(name))
}

/// Comma-separated list of addable city names, for hints and error messages.
pub fn supported_names() -> String {
    SUPPORTED_CITIES
        .iter()
        .map(|city| city.name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_trims() {
        let city = lookup("  oXfOrD ").expect("oxford is supported");
        assert_eq!(city.name, "Oxford");
        assert_eq!((city.lat, city.lon), (51.7520, -1.2577));
    }

    #[test]
    fn lookup_unknown_city() {
        assert!(lookup("Atlantis").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn defaults_are_not_addable() {
        assert!(lookup("London").is_none());
        assert!(lookup("manchester").is_none());
    }

    #[test]
    fn supported_names_lists_every_city() {
        let names = supported_names();
        assert!(names.starts_with("Birmingham, Leeds"));
        assert!(names.ends_with("Oxford, Cambridge"));
        assert_eq!(names.split(", ").count(), SUPPORTED_CITIES.len());
    }
}
