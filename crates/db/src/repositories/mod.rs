//! Stateless repositories, one per table.

pub mod alert_repo;
pub mod caregiver_repo;
pub mod doctor_repo;
pub mod glucose_reading_repo;
pub mod medication_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use caregiver_repo::CaregiverRepo;
pub use doctor_repo::DoctorRepo;
pub use glucose_reading_repo::GlucoseReadingRepo;
pub use medication_repo::MedicationRepo;
pub use user_repo::UserRepo;
