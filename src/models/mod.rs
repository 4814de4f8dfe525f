pub mod driver;
pub mod payment;
pub mod receipt;
pub mod ride;
pub mod user;
pub mod vehicle;
pub mod wallet;
