//! Chat orchestration for the buyer and seller assistants.
//!
//! The model only ever produces conversation text. Whether a buyer turn
//! returns a car, an upsell, or a relayed reply is decided here without the
//! model:
//! 1. **Turn policy** (`guardrails`) - quota first, then the intake gate
//! 2. **Matching** - random pick from the car catalog plus a seller contact
//! 3. **Relay** (`relay`) - persona prompt + transcript to the completion API
//! 4. **Extraction** - seller replies are scanned for a listing block
//!
//! # Key Types
//!
//! - `AgentRuntime` - per-turn entry point (see `runtime` module)
//! - `LlmClient` - completion seam with OpenAI and Ollama implementations
//! - `TurnPolicy` - quota and questionnaire decision for buyer turns

pub mod guardrails;
pub mod llm;
pub mod personas;
pub mod relay;
pub mod runtime;

pub use guardrails::{TurnDecision, TurnPolicy};
pub use llm::{client_from_config, LlmClient, OllamaClient, OpenAiClient};
pub use personas::Persona;
pub use relay::ConversationalRelay;
pub use runtime::{AgentRuntime, BuyerReply, BuyerTurn, SellerReply, SellerTurn};
