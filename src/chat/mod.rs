pub mod files;
pub mod session;
pub mod transcript;

pub use files::{ChatServiceClient, ScamCheckResult};
pub use session::{ChatEvent, ChatSession, ConnectionState};
pub use transcript::{Message, Role, Source, Transcript};
