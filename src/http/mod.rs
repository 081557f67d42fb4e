pub mod browse;
pub mod client;
pub mod description;
pub mod invalid;
pub mod soap;
