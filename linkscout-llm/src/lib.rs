//! Text-generation clients used to turn person records into search queries.
//!
//! - [`traits::LlmClient`]: the capability the search core programs against
//! - [`azure::AzureChatClient`]: Azure OpenAI chat-completions implementation

pub mod azure;
pub mod traits;
