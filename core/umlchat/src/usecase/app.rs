//! 対話アプリのユースケース
//!
//! 設定からメモリ・API キー・モデル・レンダラを組み立て、対話ループを回し、終了時にトランスクリプトを書く。

use crate::adapter::{DotenvCredential, EnvCredential, PromptCredential};
use crate::cli::Config;
use crate::domain::Transcript;
use crate::ports::inbound::RunChatApp;
use crate::ports::outbound::{Console, InterruptChecker, LineReader};
use crate::usecase::chat::ChatLoop;
use common::error::Error;
use common::llm::create_model;
use common::llm::groq::API_KEY_ENV;
use common::plantuml::{DiagramRenderer, DiagramWriter};
use common::ports::outbound::{
    resolve_api_key, CredentialSource, DiagramService, FileSystem, Log, LogLevel, LogRecord,
};
use common::{ConversationAgent, ConversationMemory};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// モデルのベース URL を上書きする環境変数
pub const BASE_URL_ENV: &str = "GROQ_BASE_URL";

/// API キーを探す .env 形式のファイル（この順に読む）
const DOTENV_FILES: [&str; 2] = [".env", ".env.local"];

/// 対話アプリ
pub struct ChatApp {
    fs: Arc<dyn FileSystem>,
    logger: Arc<dyn Log>,
    input: RefCell<Box<dyn LineReader>>,
    console: Box<dyn Console>,
    interrupt: Arc<dyn InterruptChecker>,
    /// 図のサービス。構築に失敗していれば描画なしで続ける
    diagram_service: Result<Arc<dyn DiagramService>, Error>,
    /// .env / .env.local を置くディレクトリ
    env_dir: PathBuf,
}

impl ChatApp {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fs: Arc<dyn FileSystem>,
        logger: Arc<dyn Log>,
        input: Box<dyn LineReader>,
        console: Box<dyn Console>,
        interrupt: Arc<dyn InterruptChecker>,
        diagram_service: Result<Arc<dyn DiagramService>, Error>,
        env_dir: PathBuf,
    ) -> Self {
        Self {
            fs,
            logger,
            input: RefCell::new(input),
            console,
            interrupt,
            diagram_service,
            env_dir,
        }
    }

    /// 環境変数 → .env → .env.local → 対話入力（--no-interactive でなければ）の順にキーを探す
    fn resolve_key(&self, non_interactive: bool) -> Result<String, Error> {
        let env = EnvCredential::new(API_KEY_ENV);
        let dotenv: Vec<DotenvCredential> = DOTENV_FILES
            .iter()
            .map(|name| DotenvCredential::new(Arc::clone(&self.fs), self.env_dir.join(name), API_KEY_ENV))
            .collect();
        let prompt = PromptCredential::new(&self.input, &dotenv[0]);

        let mut sources: Vec<&dyn CredentialSource> = vec![&env];
        sources.extend(dotenv.iter().map(|d| d as &dyn CredentialSource));
        if !non_interactive {
            sources.push(&prompt);
        }
        resolve_api_key(&sources, API_KEY_ENV)
    }

    fn build_agent(&self, config: &Config) -> Result<ConversationAgent, Error> {
        let memory = ConversationMemory::from_limit(config.memory_limit())?;
        let model_config = config.model_config()?;
        let api_key = if config.provider.needs_api_key() {
            Some(self.resolve_key(config.non_interactive)?)
        } else {
            None
        };
        let base_url = std::env::var(BASE_URL_ENV).ok();
        let model = create_model(
            config.provider,
            api_key,
            base_url,
            model_config,
            Arc::clone(&self.logger),
        )?;

        let mut agent = ConversationAgent::new(Box::new(model))
            .with_memory(memory)
            .with_system_prompt(config.system_prompt.clone())
            .with_output_instructions(config.output_format.clone())
            .with_logger(Arc::clone(&self.logger));
        for note in config.notes.iter().filter(|n| !n.trim().is_empty()) {
            agent.inject_system_note(note);
        }
        Ok(agent)
    }

    fn build_renderer(&self, config: &Config) -> Option<DiagramRenderer> {
        if config.no_diagrams {
            return None;
        }
        match &self.diagram_service {
            Ok(service) => Some(DiagramRenderer::new(Arc::clone(service), Arc::clone(&self.logger))),
            Err(e) => {
                self.console
                    .warn(&format!("Diagram rendering disabled: {}", e));
                None
            }
        }
    }

    fn save_transcript(&self, path: &Path, transcript: &Transcript) -> Result<(), Error> {
        if transcript.is_empty() {
            return Ok(());
        }
        let write = || -> Result<(), Error> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                self.fs.create_dir_all(parent)?;
            }
            self.fs.write(path, &transcript.render())
        };
        write().map_err(|e| Error::io_msg(format!("Failed to write transcript: {}", e)))?;
        self.console
            .say(&format!("Transcript written to {}", path.display()));
        Ok(())
    }
}

impl RunChatApp for ChatApp {
    fn run(&self, config: &Config) -> Result<i32, Error> {
        let agent = self.build_agent(config)?;
        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Info, "chat started")
                .layer("usecase")
                .kind("lifecycle")
                .field("provider", agent.model_name())
                .field("model", &config.model)
                .field("memory", agent.memory().max_messages()),
        );

        let renderer = self.build_renderer(config);
        let writer = DiagramWriter::new(Arc::clone(&self.fs), Arc::clone(&self.logger));
        let mut chat = ChatLoop::new(
            agent,
            renderer,
            writer,
            config.diagram_dir.clone(),
            config.diagram_format,
            Arc::clone(&self.interrupt),
            Arc::clone(&self.logger),
        );
        let transcript = {
            let mut input = self.input.borrow_mut();
            chat.run(input.as_mut(), self.console.as_ref())
        };
        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Info, "chat ended")
                .layer("usecase")
                .kind("lifecycle")
                .field("transcript_lines", transcript.lines().len()),
        );

        if let Some(path) = &config.transcript {
            self.save_transcript(path, &transcript)?;
        }
        Ok(0)
    }
}
