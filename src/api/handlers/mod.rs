pub mod activity;
pub mod appointment;
pub mod auth;
pub mod exchange_rate;
pub mod export;
pub mod health;
pub mod invoice;
pub mod ledger;
pub mod patient;
pub mod report;
pub mod user;
