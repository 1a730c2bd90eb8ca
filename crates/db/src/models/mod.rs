pub mod alert;
pub mod caregiver;
pub mod doctor;
pub mod glucose_reading;
pub mod medication;
pub mod user;
