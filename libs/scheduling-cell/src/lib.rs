// libs/scheduling-cell/src/lib.rs
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use models::{
    AppointmentSlot, AppointmentType, Booking, BookingValidationRules, ClinicError,
};
pub use services::conflict::windows_overlap;
pub use services::scheduling::{Clinic, NowProvider};
pub use shared_config::ClinicConfig;
