pub mod event;
pub mod registration;
pub mod email_tracking;
pub mod settings;
pub mod theme;

pub use event::*;
pub use registration::*;
pub use email_tracking::*;
pub use settings::*;
pub use theme::*;
