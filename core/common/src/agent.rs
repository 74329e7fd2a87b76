//! 会話エージェント
//!
//! ペルソナ・上限付き履歴・新しいユーザー発言からプロンプトを組み、モデルを 1 回呼んで応答を履歴に積む。
//! 再試行はしない（モデル側の設定に任せる）。モデルのエラーはそのまま呼び出し元へ返す。

use crate::adapter::NoopLog;
use crate::domain::{Message, Role};
use crate::error::Error;
use crate::memory::ConversationMemory;
use crate::ports::outbound::{ChatModel, Log, LogLevel, LogRecord};
use crate::prompts::{compose_system_text, DEFAULT_OUTPUT_INSTRUCTIONS, DEFAULT_SYSTEM_PROMPT};
use std::sync::Arc;

/// 1 会話分のエージェント。1 つの呼び出し元から順に使う前提でロックは持たない。
pub struct ConversationAgent {
    memory: ConversationMemory,
    system_prompt: String,
    output_instructions: String,
    model: Box<dyn ChatModel>,
    logger: Arc<dyn Log>,
}

impl ConversationAgent {
    /// 既定のペルソナ・出力形式・メモリ（20 件）で作る
    pub fn new(model: Box<dyn ChatModel>) -> Self {
        Self {
            memory: ConversationMemory::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            output_instructions: DEFAULT_OUTPUT_INSTRUCTIONS.to_string(),
            model,
            logger: Arc::new(NoopLog),
        }
    }

    pub fn with_memory(mut self, memory: ConversationMemory) -> Self {
        self.memory = memory;
        self
    }

    /// 空や None なら既定のペルソナのまま
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        if let Some(p) = prompt.filter(|p| !p.trim().is_empty()) {
            self.system_prompt = p;
        }
        self
    }

    /// 空や None なら既定の出力形式のまま
    pub fn with_output_instructions(mut self, instructions: Option<String>) -> Self {
        if let Some(i) = instructions.filter(|i| !i.trim().is_empty()) {
            self.output_instructions = i;
        }
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Log>) -> Self {
        self.logger = logger;
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn output_instructions(&self) -> &str {
        &self.output_instructions
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// ユーザー発言を履歴に積み、モデルを呼び、応答を履歴に積んで返す。
    ///
    /// 空白のみの入力は `Error::InvalidArgument`（履歴もモデルも触らない）。
    pub fn respond(&mut self, user_input: &str) -> Result<String, Error> {
        let user_input = user_input.trim();
        if user_input.is_empty() {
            return Err(Error::invalid_argument("user_input must not be empty"));
        }

        self.memory.add_user_message(user_input);
        let prompt = self.build_prompt();
        let reply = self.model.invoke(&prompt).map_err(|e| {
            let _ = self.logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("core")
                    .kind("model")
                    .field("provider", self.model.name()),
            );
            e
        })?;
        let _ = self.logger.log(
            &LogRecord::new(LogLevel::Info, "model replied")
                .layer("core")
                .kind("model")
                .field("provider", self.model.name())
                .field("prompt_messages", prompt.len())
                .field("reply_len", reply.len()),
        );
        self.memory.add_ai_message(&reply);
        Ok(reply)
    }

    /// モデルに送るメッセージ列: システム文（ペルソナ + 出力形式）の後に現在の履歴
    pub fn build_prompt(&self) -> Vec<Message> {
        let system_text = compose_system_text(&self.system_prompt, Some(&self.output_instructions));
        let history = self.memory.history();
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(system_text));
        messages.extend(history);
        messages
    }

    /// モデルを呼ばずにシステムメモを履歴に追加する
    pub fn inject_system_note(&mut self, note: &str) {
        self.memory.add_system_message(note);
    }

    pub fn reset(&mut self) {
        self.memory.clear();
    }

    /// "role: content" 形式の履歴
    pub fn history_lines(&self) -> Vec<String> {
        self.memory
            .history()
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect()
    }

    /// 空文字にすると出力形式の指示を送らなくなる
    pub fn update_output_instructions(&mut self, instructions: &str) {
        self.output_instructions = instructions.trim().to_string();
    }

    pub fn update_system_prompt(&mut self, prompt: &str) {
        self.system_prompt = prompt.trim().to_string();
    }

    /// 既存の会話を履歴に流し込む（上限は通常どおり適用）
    pub fn seed_history<'a, I>(&mut self, messages: I)
    where
        I: IntoIterator<Item = (Role, &'a str)>,
    {
        for (role, content) in messages {
            self.memory.add(role, content);
        }
    }
}
