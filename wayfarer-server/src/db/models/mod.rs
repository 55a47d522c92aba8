//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod admin;

// Catalog Domain
pub mod flight;
pub mod hotel;
pub mod package;
pub mod visa;

// Enquiries
pub mod enquiry;

// Re-exports
pub use admin::{Admin, AdminId};
pub use enquiry::{Enquiry, EnquiryCreate, EnquiryId};
pub use flight::{Flight, FlightId};
pub use hotel::{Hotel, HotelId};
pub use package::{Activity, Package, PackageId};
pub use visa::{Visa, VisaId};
