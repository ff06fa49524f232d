//! Query services behind the client routes.

pub mod country;
pub mod customers;
pub mod geography;
pub mod products;
pub mod transactions;
