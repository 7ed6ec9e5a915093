//! AI Integration Layer
//!
//! Provider dispatch, bounded and retried chat calls, and JSON extraction
//! from free-form model output.

pub mod caller;
pub mod json;
pub mod provider;
pub mod timeout;

pub use caller::{AiCallOptions, AiCaller};
pub use json::{parse_json_response, strip_code_fences};
pub use provider::{
    AnthropicClient, ChatClient, ChatRequest, OpenAiCompatibleClient, ProviderDispatcher,
    SharedChatClient, WireProtocol, is_anthropic_proxy,
};
pub use timeout::with_timeout;
