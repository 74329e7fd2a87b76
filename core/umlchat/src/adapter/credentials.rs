//! API キーの取得元（CredentialSource 実装）
//!
//! 環境変数、.env 形式のファイル、対話入力の 3 種。どの順で試すかは usecase が決める。

use crate::ports::outbound::LineReader;
use common::error::Error;
use common::ports::outbound::{CredentialSource, FileSystem};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 対話入力で出すプロンプト
pub const KEY_PROMPT: &str =
    "Enter GROQ API key (create one for free at https://console.groq.com/keys): ";

/// 環境変数から読む
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn name(&self) -> &str {
        "env"
    }

    fn api_key(&self) -> Result<Option<String>, Error> {
        Ok(std::env::var(&self.var).ok())
    }
}

/// `.env` 形式の内容から key の値を探す
///
/// 解釈は dotenvy に任せ、プロセスの環境変数には書き込まない。解釈できない行は読み飛ばし、同じキーが複数あれば最初の行を使う。
pub fn parse_dotenv(contents: &str, key: &str) -> Option<String> {
    dotenvy::from_read_iter(contents.as_bytes())
        .filter_map(Result::ok)
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
}

/// `.env` 形式のファイルから読む。store でキーを書き戻せる。
pub struct DotenvCredential {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    key: String,
}

impl DotenvCredential {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 既存の `KEY=` 行を取り除き、末尾に新しい行を足して書き戻す
    pub fn store(&self, value: &str) -> Result<(), Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::invalid_argument("API key is empty."));
        }
        let prefix = format!("{}=", self.key);
        let mut lines: Vec<String> = if self.fs.exists(&self.path) {
            self.fs
                .read_to_string(&self.path)?
                .lines()
                .filter(|l| !l.starts_with(&prefix))
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };
        lines.push(format!("{}{}", prefix, value));
        let mut contents = lines.join("\n");
        contents.push('\n');
        self.fs.write(&self.path, &contents)
    }
}

impl CredentialSource for DotenvCredential {
    fn name(&self) -> &str {
        "dotenv"
    }

    fn api_key(&self) -> Result<Option<String>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let contents = self.fs.read_to_string(&self.path)?;
        Ok(parse_dotenv(&contents, &self.key))
    }
}

/// 対話入力で尋ね、得たキーを `.env` へ保存する
pub struct PromptCredential<'a> {
    input: &'a RefCell<Box<dyn LineReader>>,
    target: &'a DotenvCredential,
}

impl<'a> PromptCredential<'a> {
    pub fn new(input: &'a RefCell<Box<dyn LineReader>>, target: &'a DotenvCredential) -> Self {
        Self { input, target }
    }
}

impl CredentialSource for PromptCredential<'_> {
    fn name(&self) -> &str {
        "prompt"
    }

    fn api_key(&self) -> Result<Option<String>, Error> {
        let line = self
            .input
            .borrow_mut()
            .read_line(KEY_PROMPT)?
            .ok_or_else(|| Error::config("No API key provided."))?;
        let key = line.trim();
        if key.is_empty() {
            return Err(Error::config("GROQ API key is required."));
        }
        self.target.store(key)?;
        Ok(Some(key.to_string()))
    }
}
