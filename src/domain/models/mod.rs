pub mod company;
pub mod request;
pub mod schedule;
pub mod system_config;
pub mod ticket;
pub mod user;
