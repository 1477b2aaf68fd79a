use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Decimal-degree range check. Enforced at the API boundary; the
    /// distance function itself assumes valid input.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::Location;

    #[test]
    fn in_range_coordinates_are_valid() {
        let p = Location {
            lat: -23.5613,
            lng: -46.6565,
        };
        assert!(p.is_valid());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(!Location { lat: 91.0, lng: 0.0 }.is_valid());
        assert!(!Location { lat: 0.0, lng: 181.0 }.is_valid());
        assert!(!Location {
            lat: -90.5,
            lng: -180.5
        }
        .is_valid());
    }
}
