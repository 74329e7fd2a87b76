//! 対話ループ
//!
//! 1 行読んでコマンドを振り分け、発言ならモデルに送り、応答中の PlantUML を描画・保存する。
//! 起きたことはトランスクリプトに積み、ループ終了時に返す。

use crate::domain::{ChatCommand, Transcript};
use crate::ports::outbound::{Console, InterruptChecker, LineReader};
use common::domain::{Diagram, DiagramFormat};
use common::plantuml::{DiagramRenderer, DiagramWriter};
use common::ports::outbound::{Log, LogLevel, LogRecord};
use common::ConversationAgent;
use std::path::PathBuf;
use std::sync::Arc;

pub const USER_PROMPT: &str = "You > ";

/// 対話ループ本体
pub struct ChatLoop {
    agent: ConversationAgent,
    /// None なら図を描画しない
    renderer: Option<DiagramRenderer>,
    writer: DiagramWriter,
    diagram_dir: PathBuf,
    diagram_format: DiagramFormat,
    interrupt: Arc<dyn InterruptChecker>,
    logger: Arc<dyn Log>,
}

impl ChatLoop {
    pub fn new(
        agent: ConversationAgent,
        renderer: Option<DiagramRenderer>,
        writer: DiagramWriter,
        diagram_dir: PathBuf,
        diagram_format: DiagramFormat,
        interrupt: Arc<dyn InterruptChecker>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            agent,
            renderer,
            writer,
            diagram_dir,
            diagram_format,
            interrupt,
            logger,
        }
    }

    #[allow(dead_code)]
    pub fn agent(&self) -> &ConversationAgent {
        &self.agent
    }

    /// 終了（/exit・EOF・割り込み・モデルエラー）までループし、トランスクリプトを返す
    pub fn run(&mut self, input: &mut dyn LineReader, console: &dyn Console) -> Transcript {
        console.say("Type '/exit' to leave, '/reset' to clear memory, '/note <text>' to add a system note,");
        console.say("or '/format <text>' to update output instructions on the fly.");

        let mut transcript = Transcript::new();
        loop {
            let line = match input.read_line(USER_PROMPT) {
                Ok(Some(line)) if !self.interrupt.is_interrupted() => line,
                Ok(_) => {
                    console.say("\nSession ended.");
                    break;
                }
                Err(e) => {
                    console.warn(&format!("Error: {}", e));
                    console.say("Session ended.");
                    break;
                }
            };

            match ChatCommand::parse(&line) {
                ChatCommand::Exit => {
                    console.say("Goodbye!");
                    break;
                }
                ChatCommand::Reset => {
                    self.agent.reset();
                    transcript.push("# reset");
                    console.say("Memory cleared.");
                }
                ChatCommand::Note(note) => {
                    if !note.is_empty() {
                        self.agent.inject_system_note(&note);
                        transcript.push(format!("system-note: {}", note));
                        console.say("Added system note.");
                    }
                }
                ChatCommand::Format(fmt) => {
                    self.agent.update_output_instructions(&fmt);
                    transcript.push(format!("output-format: {}", fmt));
                    console.say("Updated output instructions.");
                }
                ChatCommand::Empty => {}
                ChatCommand::Say(text) => {
                    let reply = match self.agent.respond(&text) {
                        Ok(reply) => reply,
                        Err(e) => {
                            console.say(&format!("Error: {}", e));
                            break;
                        }
                    };
                    transcript.push(format!("user: {}", text));
                    transcript.push(format!("assistant: {}", reply));
                    console.say(&format!("Agent > {}", reply));
                    self.handle_diagrams(&reply, console, &mut transcript);
                }
            }
        }
        transcript
    }

    fn handle_diagrams(&self, reply: &str, console: &dyn Console, transcript: &mut Transcript) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        let diagrams: Vec<Diagram> = match renderer.render_from_text(reply, self.diagram_format) {
            Ok(d) => d,
            Err(e) => {
                console.warn(&format!("Diagram rendering skipped: {}", e));
                return;
            }
        };
        if diagrams.is_empty() {
            return;
        }

        for diagram in &diagrams {
            if let Some(url) = &diagram.image_url {
                console.say(&format!("Diagram image URL: {}", url));
                transcript.push(format!("diagram_image_url: {}", url));
            }
            if let Some(url) = &diagram.editor_url {
                console.say(&format!("Diagram editor URL: {}", url));
                transcript.push(format!("diagram_editor_url: {}", url));
            }
        }

        match self.writer.save(&diagrams, &self.diagram_dir) {
            Ok(paths) => {
                for path in paths {
                    console.say(&format!("Diagram saved to {}", path.display()));
                    transcript.push(format!("diagram: {}", path.display()));
                }
            }
            Err(e) => {
                let _ = self.logger.log(
                    &LogRecord::new(LogLevel::Error, e.to_string())
                        .layer("usecase")
                        .kind("error")
                        .field("diagram_dir", self.diagram_dir.display().to_string()),
                );
                console.warn(&format!("Failed to save diagrams: {}", e));
            }
        }
    }
}
