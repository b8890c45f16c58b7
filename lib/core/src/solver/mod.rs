pub use api::*;
pub use extensions::*;
pub use limits::*;
pub use types::*;

mod api;
mod extensions;
mod limits;
mod types;
