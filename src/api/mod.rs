pub mod dtos;
pub mod extractors;
pub mod handlers;
pub mod lockdown;
pub mod router;
