//! Text-generation provider collaborators.

pub mod completion;
pub mod flags;
pub mod request;

pub use completion::{ChunkStream, CompletionProvider, collect_response};
pub use flags::{FlagFuture, HOSTED_API_KEY, HostedApiFlag, LocalFlagStore, StaticFlag};
pub use request::{ChatMessage, ChatRole, MeetingAiConfig, ProviderRequest, SelectedProvider};
