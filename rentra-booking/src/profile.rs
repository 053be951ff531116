use chrono::{DateTime, NaiveDate, Utc};
use rentra_shared::{Redacted, UserId, VehicleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseStatus {
    Unverified,
    Pending,
    Verified,
}

/// Driver-license record. Capture and verification of the physical document
/// happen elsewhere; only the resulting fields are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverLicense {
    pub number: Redacted<String>,
    pub holder_name: String,
    pub expires_on: NaiveDate,
    pub status: LicenseStatus,
}

impl DriverLicense {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on < today
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub phone: Option<Redacted<String>>,
    pub email: Option<Redacted<String>>,
    pub favorites: BTreeSet<VehicleId>,
    pub license: Option<DriverLicense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            display_name: None,
            phone: None,
            email: None,
            favorites: BTreeSet::new(),
            license: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge-style update: fields left out of the patch keep their value.
    pub fn apply(&mut self, patch: ProfilePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.display_name {
            self.display_name = Some(name);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(Redacted::new(phone));
        }
        if let Some(email) = patch.email {
            self.email = Some(Redacted::new(email));
        }
        self.updated_at = now;
    }

    pub fn is_favorite(&self, vehicle_id: VehicleId) -> bool {
        self.favorites.contains(&vehicle_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
