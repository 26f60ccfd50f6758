pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod page;
pub mod quick_action;
pub mod responder;
pub mod scheduler;
pub mod sentiment;

pub use config::{ChatConfig, ServerConfig};
pub use conversation::{Conversation, ConversationState};
pub use error::{ChatError, Result};
pub use message::{ChatMessage, Sender};
pub use quick_action::QuickAction;
pub use responder::{RandomSource, ReplyBook, Responder, SeededRandom, ThreadRandom};
pub use scheduler::{Scheduler, TokioScheduler, VirtualClock};
pub use sentiment::{classify, Sentiment};
