pub mod email_service;
pub mod email_transport;
pub mod sendgrid_service;
pub mod emailjs_service;
pub mod registration_service;
pub mod dashboard_service;
pub mod settings_service;

pub use email_service::*;
pub use email_transport::*;
pub use registration_service::*;
pub use dashboard_service::*;
pub use settings_service::*;
