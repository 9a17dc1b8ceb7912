pub mod health;
pub mod metrics;
pub mod events;
pub mod registrations;
pub mod emails;
pub mod settings;
pub mod dashboard;
pub mod themes;
pub mod swagger;
