//! Web server module
//!
//! Serves the description document and translated search feeds over HTTP.

mod handlers;
mod routes;
mod state;

pub use handlers::{ATOM_CONTENT_TYPE, DESCRIPTION_CONTENT_TYPE};
pub use routes::create_router;
pub use state::AppState;
