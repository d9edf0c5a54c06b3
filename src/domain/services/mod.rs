pub mod activity;
pub mod auth_gate;
pub mod auth_service;
pub mod calendar;
pub mod export;
pub mod ledger_aggregator;
pub mod notification;
pub mod role_policy;
