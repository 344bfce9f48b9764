// libs/scheduling-cell/src/services/scheduling.rs
use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::ClinicConfig;

use crate::models::{
    AppointmentSlot, AppointmentType, Booking, BookingValidationRules, ClinicError,
};
use crate::services::conflict::windows_overlap;

/// Bookable boundaries are fixed half-hour windows during clinic hours.
const SLOT_INTERVAL_MINUTES: i64 = 30;

/// Injected clock capability. Validation never reads global time directly.
pub type NowProvider = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A single clinic's appointment calendar: operating hours, the appointment
/// type catalog, and the confirmed bookings.
///
/// The booking list is exclusively owned; mutation happens only through
/// `create_booking` (append) and `clear_bookings` (reset). Callers serialize
/// access externally.
pub struct Clinic {
    opening_hour: f64,
    closing_hour: f64,
    rules: BookingValidationRules,
    now: NowProvider,
    bookings: Vec<Booking>,
}

impl Clinic {
    pub fn new(config: &ClinicConfig) -> Self {
        Self::with_now_provider(config, Box::new(Utc::now))
    }

    /// Build a clinic with a pinned clock, so validation against "now" is
    /// deterministic under test.
    pub fn with_now_provider(config: &ClinicConfig, now: NowProvider) -> Self {
        let config = if config.is_valid() {
            config.clone()
        } else {
            warn!(
                "Invalid clinic hours {}..{}, using defaults",
                config.opening_hour, config.closing_hour
            );
            ClinicConfig::default()
        };

        Self {
            opening_hour: config.opening_hour,
            closing_hour: config.closing_hour,
            rules: BookingValidationRules::default(),
            now,
            bookings: Vec::new(),
        }
    }

    /// The fixed catalog of bookable appointment types.
    pub fn appointment_types(&self) -> &'static [AppointmentType] {
        &AppointmentType::CATALOG
    }

    /// Advisory operating-hours check kept for callers that only care whether
    /// a window fits the clinic day. `is_booking_valid` is the authority used
    /// by booking creation.
    ///
    /// Only wall-clock time of day is inspected; the date components are
    /// ignored.
    pub fn validate_booking(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let start_hour = hour_of_day(start);
        let end_hour = hour_of_day(end);

        start_hour < end_hour && start_hour >= self.opening_hour && end_hour <= self.closing_hour
    }

    /// Validation authority for booking creation. Checks short-circuit on the
    /// first failure: operating hours, then the past, then minimum notice.
    ///
    /// Returns the reason instead of acting on it so callers can treat the
    /// outcome as advisory; `create_booking` turns it into a hard error.
    pub fn is_booking_valid(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), ClinicError> {
        if !self.validate_booking(start, end) {
            return Err(ClinicError::OutsideHours);
        }

        let now = (self.now)();
        if start < now {
            return Err(ClinicError::InPast);
        }

        if start < now + Duration::hours(self.rules.min_advance_booking_hours) {
            return Err(ClinicError::WithinLeadTime);
        }

        Ok(())
    }

    /// Enumerate every half-hour slot between opening and closing for `days`
    /// consecutive calendar days, starting at the midnight of `start_date`.
    ///
    /// A slot is booked when its `[start, start+30min)` window intersects any
    /// confirmed booking. The result is recomputed from current state on
    /// every call; degenerate inputs yield an empty sequence.
    pub fn get_appointment_slots(&self, start_date: DateTime<Utc>, days: i32) -> Vec<AppointmentSlot> {
        debug!("Enumerating slots for {} day(s) from {}", days, start_date);

        let opening_minute = (self.opening_hour * 60.0).round() as i64;
        let closing_minute = (self.closing_hour * 60.0).round() as i64;

        let mut slots = Vec::new();

        for day_offset in 0..days as i64 {
            let midnight = midnight_of(start_date + Duration::days(day_offset));

            let mut minute = opening_minute;
            while minute < closing_minute {
                let slot_start = midnight + Duration::minutes(minute);
                let slot_end = slot_start + Duration::minutes(SLOT_INTERVAL_MINUTES);

                let booked = self
                    .bookings
                    .iter()
                    .any(|booking| windows_overlap(slot_start, slot_end, booking.start, booking.end));

                slots.push(AppointmentSlot {
                    day: slot_start.format("%A, %B %-d").to_string(),
                    date: slot_start,
                    time: slot_start.format("%H:%M").to_string(),
                    booked,
                });

                minute += SLOT_INTERVAL_MINUTES;
            }
        }

        debug!("Found {} slots", slots.len());
        slots
    }

    /// Book an appointment of the given type starting at `date`.
    ///
    /// A conflicting slot is always rejected as `OverlappingBooking`, even
    /// when the window would also have failed validation.
    pub fn create_booking(
        &mut self,
        date: DateTime<Utc>,
        patient_id: &str,
        appointment_type_id: &str,
    ) -> Result<Booking, ClinicError> {
        if patient_id.trim().is_empty() || appointment_type_id.trim().is_empty() {
            return Err(ClinicError::InvalidInput);
        }

        let appointment_type = AppointmentType::from_id(appointment_type_id)
            .ok_or_else(|| ClinicError::UnknownAppointmentType(appointment_type_id.to_string()))?;

        let end = date + appointment_type.duration();
        let validity = self.is_booking_valid(date, end);

        let has_conflict = self
            .bookings
            .iter()
            .any(|booking| windows_overlap(date, end, booking.start, booking.end));

        if has_conflict {
            warn!(
                "Booking conflict for patient {} at {} ({})",
                patient_id, date, appointment_type
            );
            return Err(ClinicError::OverlappingBooking);
        }

        if let Err(reason) = validity {
            debug!(
                "Rejected booking for patient {} at {}: {}",
                patient_id, date, reason
            );
            return Err(reason);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            appointment_type,
            start: date,
            end,
        };

        info!(
            "Booked {} for patient {} from {} to {}",
            appointment_type.display_name(),
            patient_id,
            booking.start,
            booking.end
        );

        self.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Reset the booking list. Administrative reset and test isolation hook.
    pub fn clear_bookings(&mut self) {
        info!("Clearing {} booking(s)", self.bookings.len());
        self.bookings.clear();
    }

    /// All bookings, or only those starting on the given calendar day.
    pub fn get_bookings(&self, date: Option<NaiveDate>) -> Vec<Booking> {
        match date {
            Some(day) => self
                .bookings
                .iter()
                .filter(|booking| booking.start.date_naive() == day)
                .cloned()
                .collect(),
            None => self.bookings.clone(),
        }
    }
}

/// Wall-clock time of day as a fractional hour (10:30 -> 10.5).
fn hour_of_day(t: DateTime<Utc>) -> f64 {
    f64::from(t.hour()) + f64::from(t.minute()) / 60.0
}

fn midnight_of(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    // Clinic hours 9-17, now pinned to Monday 2025-09-08 13:00.
    fn test_clinic() -> Clinic {
        Clinic::with_now_provider(
            &ClinicConfig::new(9.0, 17.0),
            Box::new(|| Utc.with_ymd_and_hms(2025, 9, 8, 13, 0, 0).unwrap()),
        )
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn nine_to_ten_is_valid() {
        let clinic = test_clinic();
        assert!(clinic.validate_booking(at(8, 9, 0), at(8, 10, 0)));
    }

    #[test]
    fn seven_pm_start_is_invalid() {
        let clinic = test_clinic();
        assert!(!clinic.validate_booking(at(8, 19, 0), at(8, 20, 0)));
    }

    #[test]
    fn five_pm_end_is_valid() {
        let clinic = test_clinic();
        assert!(clinic.validate_booking(at(8, 16, 0), at(8, 17, 0)));
    }

    #[test]
    fn half_past_five_start_is_invalid() {
        let clinic = test_clinic();
        assert!(!clinic.validate_booking(at(8, 17, 30), at(8, 18, 0)));
    }

    #[test]
    fn end_before_start_is_invalid() {
        let clinic = test_clinic();
        assert!(!clinic.validate_booking(at(8, 3, 30), at(8, 1, 0)));
    }

    #[test]
    fn fractional_closing_hour_admits_half_past_five_end() {
        let clinic = Clinic::with_now_provider(
            &ClinicConfig::new(9.0, 17.5),
            Box::new(|| Utc.with_ymd_and_hms(2025, 9, 8, 13, 0, 0).unwrap()),
        );

        assert!(clinic.validate_booking(at(8, 16, 30), at(8, 17, 30)));
        assert!(!clinic.validate_booking(at(8, 17, 0), at(8, 18, 0)));
    }

    #[test]
    fn hours_failure_is_reported_before_past_failure() {
        let clinic = test_clinic();
        // 7:00 on a past day violates both checks; hours wins.
        assert_matches!(
            clinic.is_booking_valid(at(1, 7, 0), at(1, 8, 0)),
            Err(ClinicError::OutsideHours)
        );
    }

    #[test]
    fn past_failure_is_reported_before_lead_time() {
        let clinic = test_clinic();
        assert_matches!(
            clinic.is_booking_valid(at(8, 10, 0), at(8, 11, 0)),
            Err(ClinicError::InPast)
        );
    }

    #[test]
    fn start_within_two_hours_is_rejected() {
        let clinic = test_clinic();
        assert_matches!(
            clinic.is_booking_valid(at(8, 14, 0), at(8, 15, 0)),
            Err(ClinicError::WithinLeadTime)
        );
    }

    #[test]
    fn start_exactly_two_hours_out_is_accepted() {
        let clinic = test_clinic();
        assert_matches!(clinic.is_booking_valid(at(8, 15, 0), at(8, 16, 0)), Ok(()));
    }

    #[test]
    fn blank_patient_id_is_invalid_input() {
        let mut clinic = test_clinic();
        assert_matches!(
            clinic.create_booking(at(9, 10, 0), "  ", "appt"),
            Err(ClinicError::InvalidInput)
        );
        assert_matches!(
            clinic.create_booking(at(9, 10, 0), "p1", ""),
            Err(ClinicError::InvalidInput)
        );
    }

    #[test]
    fn unknown_appointment_type_is_rejected() {
        let mut clinic = test_clinic();
        assert_matches!(
            clinic.create_booking(at(9, 10, 0), "p1", "surgery"),
            Err(ClinicError::UnknownAppointmentType(id)) if id == "surgery"
        );
    }

    #[test]
    fn catalog_is_exposed() {
        let clinic = test_clinic();
        assert_eq!(clinic.appointment_types().len(), 3);
    }

    #[test]
    fn invalid_config_falls_back_to_default_hours() {
        let clinic = Clinic::with_now_provider(
            &ClinicConfig::new(17.0, 9.0),
            Box::new(|| Utc.with_ymd_and_hms(2025, 9, 8, 13, 0, 0).unwrap()),
        );

        // Default 9-17 day.
        assert!(clinic.validate_booking(at(8, 9, 0), at(8, 17, 0)));
        assert!(!clinic.validate_booking(at(8, 8, 0), at(8, 9, 0)));
    }
}
