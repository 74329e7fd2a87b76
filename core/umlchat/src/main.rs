mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;


use std::process;
use common::error::Error;
use common::llm::GROQ_TEXT_MODELS;
use common::ports::outbound::{LogLevel, LogRecord};
use cli::{parse_args, print_completion, Config, ParseOutcome};
use ports::inbound::RunChatApp;
use wiring::{wire_umlchat, App};

/// ヘルプ表示か対話かを振り分ける Runner（開始・終了をログに残す）
struct Runner {
    app: App,
}

impl RunChatApp for Runner {
    fn run(&self, config: &Config) -> Result<i32, Error> {
        let command_name = if config.help { "help" } else { "chat" };
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = if config.help {
            print_help();
            Ok(0)
        } else {
            self.app.chat_app.run(config)
        };

        let code = result.as_ref().copied().unwrap_or_else(|e| e.exit_code());
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self.app.logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("umlchat: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_umlchat(&config);
    let runner = Runner { app };
    runner.run(&config)
}

fn print_usage() {
    eprintln!("Usage: umlchat [options]");
}

fn print_help() {
    println!("Usage: umlchat [options]");
    println!("Options:");
    println!("  -h, --help                  Show this help message");
    println!("  --model <model>             Groq chat model (common choices: {})", GROQ_TEXT_MODELS.join(", "));
    println!("  --temperature <value>       Sampling temperature (default: 0.2)");
    println!("  --max-tokens <n>            Optional cap on generated tokens");
    println!("  --timeout <seconds>         Request timeout in seconds");
    println!("  --max-retries <n>           Retry attempts for Groq API calls (default: 2)");
    println!("  --memory <n>                Recent messages to retain (default: 20, 0 for unlimited)");
    println!("  --system-prompt <text>      Custom system prompt for the agent persona");
    println!("  --output-format <text>      Extra instructions describing the desired output style");
    println!("  --note <text>               Inject a system note before the chat (repeatable)");
    println!("  --transcript <path>         Save the conversation transcript when exiting");
    println!("  --diagram-dir <dir>         Where generated diagrams are written (default: diagrams)");
    println!("  --diagram-format <format>   png or svg (default: png)");
    println!("  --provider <provider>       groq or echo (echo works offline; default: groq)");
    println!("  --no-diagrams               Do not render PlantUML found in replies");
    println!("  --no-interactive            Never prompt for the API key");
    println!("  --log-file <path>           Append JSONL logs to this file");
    println!("  --generate <shell>          Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Chat commands:");
    println!("  /exit, exit, quit           Leave the chat");
    println!("  /reset                      Clear conversation memory");
    println!("  /note <text>                Add a system note");
    println!("  /format <text>              Replace the output instructions");
    println!();
    println!("Environment:");
    println!("  GROQ_API_KEY         API key (also read from .env and .env.local)");
    println!("  GROQ_BASE_URL        Override the Groq API base URL");
    println!("  PLANTUML_SERVER_URL  PlantUML server endpoint (default: https://www.plantuml.com/plantuml/<format>/)");
    println!("  UMLCHAT_LOG_FILE     JSONL log file when --log-file is not given");
}
