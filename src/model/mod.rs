pub mod config;
pub mod data_item;
pub mod doc;
pub mod preference;
pub mod screen;
pub mod session;

pub use config::*;
pub use data_item::*;
pub use doc::*;
pub use preference::*;
pub use screen::*;
pub use session::*;
