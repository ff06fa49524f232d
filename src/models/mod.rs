//! Document models and response DTOs.

pub mod geography;
pub mod pagination;
pub mod product;
pub mod transaction;
pub mod user;
