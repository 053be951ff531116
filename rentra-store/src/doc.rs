use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rentra_availability::{compose_instant, normalize_twelve_hour};
use rentra_booking::{HolderContact, Reservation, ReservationStatus};
use rentra_shared::{Redacted, ReservationId, UserId, VehicleId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("Invalid reservation document id: {0}")]
    InvalidId(String),

    #[error("Invalid date field: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp field: {0}")]
    InvalidTimestamp(String),

    #[error("Unknown reservation status: {0}")]
    UnknownStatus(String),
}

/// The stored document shape for a reservation, matching the legacy client's
/// records: an ISO date string per endpoint plus a separate 12-hour
/// wall-clock time string, with money in dollars.
///
/// Decoding runs the time strings through the normalizer, so historical
/// documents with garbage times degrade to midnight instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDoc {
    pub id: String,
    pub user_id: String,
    pub car_id: u32,
    pub pickup_date: String,
    pub return_date: String,
    pub pickup_time: String,
    pub return_time: String,
    pub pickup_location: String,
    pub return_location: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub driver_email: String,
    #[serde(default)]
    pub additional_notes: Option<String>,
    pub days: i64,
    pub price_per_day: f64,
    pub total_cost: f64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

fn date_part(raw: &str) -> Result<NaiveDate, DocError> {
    let part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(part, "%Y-%m-%d").map_err(|_| DocError::InvalidDate(raw.to_string()))
}

fn timestamp(raw: &str) -> Result<DateTime<Utc>, DocError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DocError::InvalidTimestamp(raw.to_string()))
}

fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

impl ReservationDoc {
    pub fn into_reservation(self) -> Result<Reservation, DocError> {
        let id = Uuid::parse_str(&self.id).map_err(|_| DocError::InvalidId(self.id.clone()))?;

        let pickup = compose_instant(
            date_part(&self.pickup_date)?,
            normalize_twelve_hour(&self.pickup_time),
        );
        let return_at = compose_instant(
            date_part(&self.return_date)?,
            normalize_twelve_hour(&self.return_time),
        );

        let status = match self.status.as_str() {
            "upcoming" => ReservationStatus::Upcoming,
            "completed" => ReservationStatus::Completed,
            "cancelled" => ReservationStatus::Cancelled,
            other => return Err(DocError::UnknownStatus(other.to_string())),
        };

        Ok(Reservation {
            id: ReservationId(id),
            vehicle_id: VehicleId(self.car_id),
            user_id: UserId::new(self.user_id),
            pickup,
            return_at,
            pickup_location: self.pickup_location,
            return_location: self.return_location,
            holder: HolderContact {
                name: self.driver_name,
                phone: Redacted::new(self.driver_phone),
                email: Redacted::new(self.driver_email),
            },
            notes: self.additional_notes,
            status,
            days: self.days,
            daily_rate_cents: dollars_to_cents(self.price_per_day),
            total_cents: dollars_to_cents(self.total_cost),
            created_at: timestamp(&self.created_at)?,
            updated_at: timestamp(&self.updated_at)?,
        })
    }

    pub fn from_reservation(reservation: &Reservation) -> Self {
        let status = match reservation.status {
            ReservationStatus::Upcoming => "upcoming",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        };
        Self {
            id: reservation.id.to_string(),
            user_id: reservation.user_id.to_string(),
            car_id: reservation.vehicle_id.0,
            pickup_date: reservation
                .pickup
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            return_date: reservation
                .return_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            pickup_time: reservation.pickup.format("%I:%M %p").to_string(),
            return_time: reservation.return_at.format("%I:%M %p").to_string(),
            pickup_location: reservation.pickup_location.clone(),
            return_location: reservation.return_location.clone(),
            driver_name: reservation.holder.name.clone(),
            driver_phone: reservation.holder.phone.expose().clone(),
            driver_email: reservation.holder.email.expose().clone(),
            additional_notes: reservation.notes.clone(),
            days: reservation.days,
            price_per_day: cents_to_dollars(reservation.daily_rate_cents),
            total_cost: cents_to_dollars(reservation.total_cents),
            status: status.to_string(),
            created_at: reservation
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: reservation
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_doc() -> ReservationDoc {
        ReservationDoc {
            id: "7f0e8f3a-6d4e-4f1a-9a3b-2c1d0e9f8a7b".to_string(),
            user_id: "renter@example.com".to_string(),
            car_id: 4,
            pickup_date: "2024-06-01T00:00:00.000Z".to_string(),
            return_date: "2024-06-03T00:00:00.000Z".to_string(),
            pickup_time: "09:00 AM".to_string(),
            return_time: "05:30 PM".to_string(),
            pickup_location: "Airport".to_string(),
            return_location: "Downtown".to_string(),
            driver_name: "Alex Doe".to_string(),
            driver_phone: "555-0100".to_string(),
            driver_email: "renter@example.com".to_string(),
            additional_notes: None,
            days: 3,
            price_per_day: 85.0,
            total_cost: 313.5,
            status: "upcoming".to_string(),
            created_at: "2024-05-20T08:15:00.000Z".to_string(),
            updated_at: "2024-05-20T08:15:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_decode_composes_instants() {
        let reservation = sample_doc().into_reservation().unwrap();
        assert_eq!(
            reservation.pickup,
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(
            reservation.return_at,
            Utc.with_ymd_and_hms(2024, 6, 3, 17, 30, 0).unwrap()
        );
        assert_eq!(reservation.daily_rate_cents, 8500);
        assert_eq!(reservation.total_cents, 31350);
    }

    #[test]
    fn test_garbage_time_degrades_to_midnight() {
        let mut doc = sample_doc();
        doc.pickup_time = "soonish".to_string();
        let reservation = doc.into_reservation().unwrap();
        assert_eq!(
            reservation.pickup,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let mut doc = sample_doc();
        doc.status = "pending".to_string();
        assert!(matches!(
            doc.into_reservation(),
            Err(DocError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_round_trip_preserves_instants() {
        let original = sample_doc().into_reservation().unwrap();
        let doc = ReservationDoc::from_reservation(&original);
        assert_eq!(doc.pickup_time, "09:00 AM");
        assert_eq!(doc.return_time, "05:30 PM");
        let back = doc.into_reservation().unwrap();
        assert_eq!(back.pickup, original.pickup);
        assert_eq!(back.return_at, original.return_at);
        assert_eq!(back.total_cents, original.total_cents);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let doc = sample_doc();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("carId").is_some());
        assert!(json.get("pickupDate").is_some());
        assert!(json.get("pricePerDay").is_some());
        assert!(json.get("car_id").is_none());
    }
}
