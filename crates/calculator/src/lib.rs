pub mod cli;
pub mod config;
pub mod display;
pub mod form;
pub mod session;
pub mod tutorial;
pub mod view_state;

pub use config::AppConfig;
pub use form::{Field, FormError, FormFields};
pub use view_state::{Action, ActionError, Calculation, Transition, ViewState};
