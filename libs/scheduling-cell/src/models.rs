// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

/// The clinic's service catalog: exactly three offerings with fixed durations.
///
/// The catalog is closed, so an appointment type that parses is always a
/// bookable one; `from_id` is the only place an unknown type can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentType {
    #[serde(rename = "appt")]
    Appointment,

    #[serde(rename = "consult")]
    Consultation,

    #[serde(rename = "checkin")]
    CheckIn,
}

impl AppointmentType {
    pub const CATALOG: [AppointmentType; 3] = [
        AppointmentType::Appointment,
        AppointmentType::Consultation,
        AppointmentType::CheckIn,
    ];

    /// Look up a catalog entry by its wire id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "appt" => Some(AppointmentType::Appointment),
            "consult" => Some(AppointmentType::Consultation),
            "checkin" => Some(AppointmentType::CheckIn),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            AppointmentType::Appointment => "appt",
            AppointmentType::Consultation => "consult",
            AppointmentType::CheckIn => "checkin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AppointmentType::Appointment => "Appointment",
            AppointmentType::Consultation => "Consultation",
            AppointmentType::CheckIn => "Check-In",
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        match self {
            AppointmentType::Appointment => 60,
            AppointmentType::Consultation => 90,
            AppointmentType::CheckIn => 30,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes())
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A confirmed appointment. Immutable once created; the only removal path is
/// the clinic-wide bulk clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub patient_id: String,
    pub appointment_type: AppointmentType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A half-hour calendar window during clinic hours, independent of any
/// appointment type. Derived per query against current bookings and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSlot {
    /// Long label, e.g. "Monday, September 8".
    pub day: String,
    pub date: DateTime<Utc>,
    /// Zero-padded wall-clock label, e.g. "09:00".
    pub time: String,
    pub booked: bool,
}

// ==============================================================================
// VALIDATION MODELS
// ==============================================================================

#[derive(Debug, Clone)]
pub struct BookingValidationRules {
    pub min_advance_booking_hours: i64,
}

impl Default for BookingValidationRules {
    fn default() -> Self {
        Self {
            min_advance_booking_hours: 2,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ClinicError {
    #[error("Booking request is missing required fields")]
    InvalidInput,

    #[error("Unknown appointment type: {0}")]
    UnknownAppointmentType(String),

    #[error("Booking is outside clinic hours")]
    OutsideHours,

    #[error("Booking start time is in the past")]
    InPast,

    #[error("Booking start time is in the next two hours")]
    WithinLeadTime,

    #[error("Booking overlaps an existing appointment")]
    OverlappingBooking,
}
