pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod query;
pub mod store;

pub use config::Settings;
pub use error::SurnameError;
pub use handler::{handle, ApiResponse, SurnameRequest};
pub use model::{SurnameList, SurnameRecord};
pub use query::SurnameQuery;
pub use store::{PgSurnameSource, SurnameSource};
