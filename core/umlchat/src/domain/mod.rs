//! umlchat のドメイン型

pub mod command;
pub mod transcript;

pub use command::ChatCommand;
pub use transcript::Transcript;
