//! Outbound ポートの標準実装

pub(crate) mod credentials;
pub(crate) mod sigint_checker;
pub(crate) mod terminal;

pub(crate) use credentials::{DotenvCredential, EnvCredential, PromptCredential};
pub(crate) use sigint_checker::{NoopInterruptChecker, SigintChecker};
pub(crate) use terminal::{StdConsole, StdinLineReader};
