use rentra_shared::VehicleId;
use serde::{Deserialize, Serialize};

/// Vehicle categories in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleClass {
    Sedan,
    Suv,
    Sports,
    LuxurySedan,
    LuxurySuv,
    Crossover,
    Wagon,
    Minivan,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transmission {
    Automatic,
    Manual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Gasoline,
    Hybrid,
    Electric,
}

/// A rentable vehicle. The catalog is fixed for a session; per-day pricing is
/// the input to quote calculation, in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub class: VehicleClass,
    pub price_per_day_cents: i64,
    pub seats: u8,
    pub transmission: Transmission,
    pub fuel: FuelType,
    /// Display asset name; rendering is out of scope here.
    pub image_key: String,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_class_serializes_screaming_snake() {
        let json = serde_json::to_string(&VehicleClass::LuxurySuv).unwrap();
        assert_eq!(json, "\"LUXURY_SUV\"");
    }

    #[test]
    fn test_vehicle_deserialization() {
        let json = r#"
            {
                "id": 4,
                "brand": "Tesla",
                "model": "Model 3",
                "year": 2024,
                "class": "SEDAN",
                "price_per_day_cents": 8500,
                "seats": 5,
                "transmission": "AUTOMATIC",
                "fuel": "ELECTRIC",
                "image_key": "tesla-model-3"
            }
        "#;
        let vehicle: Vehicle = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(vehicle.id, VehicleId(4));
        assert_eq!(vehicle.fuel, FuelType::Electric);
        assert_eq!(vehicle.display_name(), "Tesla Model 3");
    }
}
