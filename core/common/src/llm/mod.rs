//! 言語モデル（外部の協調コンポーネント）
//!
//! エージェントは `ChatModel` 越しにしかモデルを知らない。実装は Groq（HTTP）と Echo（オフライン）。

pub mod config;
pub mod echo;
pub mod factory;
pub mod groq;
pub mod provider;

pub use config::{ModelConfig, DEFAULT_GROQ_MODEL, GROQ_TEXT_MODELS};
pub use echo::EchoModel;
pub use factory::{create_model, AnyModel, ProviderType};
pub use groq::GroqProvider;
pub use provider::ChatModel;
