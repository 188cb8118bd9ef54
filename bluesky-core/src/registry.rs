use crate::{
    cities::{self, City},
    error::LocationError,
    model::{Location, LocationId},
};

/// Ordered collection of tracked locations.
///
/// Ids come from a counter owned by the registry and are never reused, so a removed
/// location's id can't collide with one added later.
#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    next_id: u64,
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self {
            locations: Vec::new(),
            next_id: 1,
        }
    }

    /// Registry seeded with London and Manchester.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for city in &cities::DEFAULT_LOCATIONS {
            registry.push_city(city);
        }
        registry
    }

    /// Add a supported city by name. On failure the registry is left untouched.
    pub fn add(&mut self, name: &str) -> Result<&Location, LocationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LocationError::EmptyName);
        }

        let city = cities::lookup(trimmed).ok_or_else(|| LocationError::NotFound {
            name: trimmed.to_string(),
            supported: cities::supported_names(),
        })?;

        Ok(self.push_city(city))
    }

    /// Remove a location. Unknown ids are a no-op.
    pub fn remove(&mut self, id: LocationId) -> Option<Location> {
        let index = self.locations.iter().position(|loc| loc.id == id)?;
        Some(self.locations.remove(index))
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.id == id)
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.get(id).is_some()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn push_city(&mut self, city: &City) -> &Location {
        let id = LocationId(self.next_id);
        self.next_id += 1;

        self.locations.push(Location {
            id,
            name: city.name.to_string(),
            lat: city.lat,
            lon: city.lon,
        });

        tracing::debug!(location = city.name, %id, "location added");
        &self.locations[self.locations.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_seeded_in_order() {
        let registry = LocationRegistry::with_defaults();
        let names: Vec<_> = registry.as_slice().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["London", "Manchester"]);
    }

    #[test]
    fn add_oxford_uses_table_coordinates_and_fresh_id() {
        let mut registry = LocationRegistry::with_defaults();
        let existing: Vec<_> = registry.as_slice().iter().map(|l| l.id).collect();

        let oxford = registry.add("oxford").expect("oxford is supported").clone();

        assert_eq!(oxford.name, "Oxford");
        assert_eq!(oxford.lat, 51.7520);
        assert_eq!(oxford.lon, -1.2577);
        assert!(!existing.contains(&oxford.id));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.as_slice().last(), Some(&oxford));
    }

    #[test]
    fn add_unknown_city_leaves_registry_unchanged() {
        let mut registry = LocationRegistry::with_defaults();
        let before = registry.as_slice().to_vec();

        let err = registry.add("Atlantis").unwrap_err();

        assert!(matches!(err, LocationError::NotFound { ref name, .. } if name == "Atlantis"));
        assert_eq!(registry.as_slice(), before.as_slice());
    }

    #[test]
    fn add_blank_name_is_rejected() {
        let mut registry = LocationRegistry::new();
        assert_eq!(registry.add("   ").unwrap_err(), LocationError::EmptyName);
        assert!(registry.is_empty());
    }

    #[test]
    fn same_city_twice_gets_distinct_ids() {
        let mut registry = LocationRegistry::new();
        let first = registry.add("Leeds").unwrap().id;
        let second = registry.add("LEEDS").unwrap().id;
        assert_ne!(first, second);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = LocationRegistry::with_defaults();
        let id = registry.as_slice()[0].id;

        assert_eq!(registry.remove(id).map(|l| l.name), Some("London".to_string()));
        assert!(!registry.contains(id));
        assert!(registry.remove(id).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut registry = LocationRegistry::new();
        let first = registry.add("Bristol").unwrap().id;
        registry.remove(first);
        let second = registry.add("Bristol").unwrap().id;
        assert_ne!(first, second);
    }
}
