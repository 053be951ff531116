use crate::vehicle::{FuelType, Transmission, Vehicle, VehicleClass};
use async_trait::async_trait;
use rentra_shared::VehicleId;

/// Read-only catalog contract. Static within a session; the reference
/// implementation is the fixed fleet below.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, CatalogError>;

    async fn all_vehicles(&self) -> Result<Vec<Vehicle>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// The rental fleet. Order is significant: availability filtering must
/// preserve it so listings stay deterministic.
#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn all(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// The standard 25-vehicle fleet.
    pub fn standard() -> Self {
        use FuelType::*;
        use Transmission::*;
        use VehicleClass::*;

        Self::new(vec![
            entry(1, "Toyota", "Camry", 2023, Sedan, 4500, 5, Automatic, Hybrid, "toyota-camry"),
            entry(2, "Honda", "Civic", 2024, Sedan, 4000, 5, Automatic, Gasoline, "honda-civic"),
            entry(3, "Ford", "Mustang", 2023, Sports, 9500, 4, Manual, Gasoline, "ford-mustang"),
            entry(4, "Tesla", "Model 3", 2024, Sedan, 8500, 5, Automatic, Electric, "tesla-model-3"),
            entry(5, "BMW", "X5", 2023, Suv, 11000, 7, Automatic, Gasoline, "bmw-x5"),
            entry(6, "Mercedes-Benz", "C-Class", 2024, LuxurySedan, 10000, 5, Automatic, Gasoline, "mercedes-c-class"),
            entry(7, "Audi", "A4", 2023, Sedan, 9000, 5, Automatic, Gasoline, "audi-a4"),
            entry(8, "Jeep", "Wrangler", 2024, Suv, 7500, 5, Manual, Gasoline, "jeep-wrangler"),
            entry(9, "Chevrolet", "Tahoe", 2023, Suv, 10500, 8, Automatic, Gasoline, "chevrolet-tahoe"),
            entry(10, "Mazda", "CX-5", 2024, Crossover, 5500, 5, Automatic, Gasoline, "mazda-cx5"),
            entry(11, "Nissan", "Altima", 2023, Sedan, 4200, 5, Automatic, Gasoline, "nissan-altima"),
            entry(12, "Hyundai", "Tucson", 2024, Suv, 5000, 5, Automatic, Gasoline, "hyundai-tucson"),
            entry(13, "Kia", "Sportage", 2023, Suv, 4800, 5, Automatic, Gasoline, "kia-sportage"),
            entry(14, "Volkswagen", "Passat", 2024, Sedan, 5200, 5, Automatic, Gasoline, "volkswagen-passat"),
            entry(15, "Subaru", "Outback", 2023, Wagon, 6000, 5, Automatic, Gasoline, "subaru-outback"),
            entry(16, "Lexus", "RX 350", 2024, LuxurySuv, 12000, 7, Automatic, Hybrid, "lexus-rx350"),
            entry(17, "Porsche", "911", 2023, Sports, 25000, 4, Manual, Gasoline, "porsche-911"),
            entry(18, "Range Rover", "Evoque", 2024, LuxurySuv, 13000, 5, Automatic, Gasoline, "range-rover-evoque"),
            entry(19, "Volvo", "XC90", 2023, Suv, 9500, 7, Automatic, Hybrid, "volvo-xc90"),
            entry(20, "Acura", "MDX", 2024, Suv, 8800, 7, Automatic, Gasoline, "acura-mdx"),
            entry(21, "Dodge", "Challenger", 2023, Sports, 9000, 5, Manual, Gasoline, "dodge-challenger"),
            entry(22, "Chrysler", "Pacifica", 2024, Minivan, 7000, 8, Automatic, Hybrid, "chrysler-pacifica"),
            entry(23, "GMC", "Yukon", 2023, Suv, 11500, 8, Automatic, Gasoline, "gmc-yukon"),
            entry(24, "Cadillac", "Escalade", 2024, LuxurySuv, 15000, 8, Automatic, Gasoline, "cadillac-escalade"),
            entry(25, "Lincoln", "Navigator", 2023, LuxurySuv, 14500, 8, Automatic, Gasoline, "lincoln-navigator"),
        ])
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: u32,
    brand: &str,
    model: &str,
    year: i32,
    class: VehicleClass,
    price_per_day_cents: i64,
    seats: u8,
    transmission: Transmission,
    fuel: FuelType,
    image_key: &str,
) -> Vehicle {
    Vehicle {
        id: VehicleId(id),
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        class,
        price_per_day_cents,
        seats,
        transmission,
        fuel,
        image_key: image_key.to_string(),
    }
}

#[async_trait]
impl CatalogSource for Fleet {
    async fn vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, CatalogError> {
        Ok(self.get(id).cloned())
    }

    async fn all_vehicles(&self) -> Result<Vec<Vehicle>, CatalogError> {
        Ok(self.vehicles.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_fleet_size() {
        let fleet = Fleet::standard();
        assert_eq!(fleet.len(), 25);
    }

    #[test]
    fn test_lookup_by_id() {
        let fleet = Fleet::standard();
        let mustang = fleet.get(VehicleId(3)).unwrap();
        assert_eq!(mustang.brand, "Ford");
        assert_eq!(mustang.transmission, Transmission::Manual);
        assert!(fleet.get(VehicleId(99)).is_none());
    }

    #[test]
    fn test_fleet_order_is_stable() {
        let fleet = Fleet::standard();
        let ids: Vec<u32> = fleet.all().iter().map(|v| v.id.0).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
