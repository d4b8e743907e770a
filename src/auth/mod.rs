pub mod models;
pub mod session;
pub mod store;

pub use models::{AuthPayload, Me, Organization, RegisterRequest, TokenPair, UserProfile};
pub use session::Session;
pub use store::SessionStore;
