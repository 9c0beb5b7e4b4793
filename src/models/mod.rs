pub mod admin;
pub mod bike;
pub mod customer;
pub mod rental;
pub mod session;

pub use admin::{Admin, AdminRole};
pub use bike::{Bike, BikeCategory, BikeStatus};
pub use customer::Customer;
pub use rental::{PaymentStatus, Rental};
pub use session::{BookingSession, BookingStep, PendingCustomer, PendingDates, SessionData};
