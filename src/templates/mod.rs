pub mod layout;
pub mod login;

pub use layout::base;
pub use login::{login, login_panel, notification, submit_feedback};
