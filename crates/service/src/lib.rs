//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates request handling from data access.
//! - Reuses entity definitions and conflict classification in the `models` crate.

pub mod customer_service;
pub mod errors;
#[cfg(test)]
pub mod test_support;
