//! Provider-agnostic request, result, and stream types
//!
//! Every value here is immutable once built and owned by a single call, so
//! concurrent requests never share mutable state.

pub mod message;
pub mod request;
pub mod result;
pub mod stream;

pub use message::{Conversation, ConversationTurn, Role};
pub use request::CompletionRequest;
pub use result::CompletionResult;
pub use stream::StreamEvent;
