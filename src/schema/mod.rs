//! # Extraction Schema
//!
//! The business profile record and the contract describing it to the
//! extraction service.
//!
//! ## Key Components
//!
//! - `BusinessProfile`: The typed record, every field defaulting to its empty value
//! - `ExtractionContract`: Versioned instructions plus response schema, built as one unit
//! - `FIELD_GUIDE`: Per-field extraction rules the instructions are rendered from

mod contract;
mod profile;

pub use contract::{ExtractionContract, FIELD_GUIDE, FieldGuide, SCHEMA_VERSION, response_schema};
pub use profile::{BusinessHours, BusinessProfile, DayHours, Faq, ServiceHours, StaffMember};
