use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::DiagramFormat;
use common::error::Error;
use common::llm::config::{DEFAULT_MAX_RETRIES, DEFAULT_TEMPERATURE};
use common::llm::{ModelConfig, ProviderType, DEFAULT_GROQ_MODEL, GROQ_TEXT_MODELS};
use common::memory::DEFAULT_MAX_MESSAGES;
use std::path::PathBuf;
use std::time::Duration;

/// 既定の図の保存先
pub const DEFAULT_DIAGRAM_DIR: &str = "diagrams";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub help: bool,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// --timeout: 秒（小数可）。未指定なら無制限
    pub timeout: Option<f64>,
    pub max_retries: u32,
    /// --memory: 保持するメッセージ数。0 は無制限、負数は不正
    pub memory: i64,
    pub system_prompt: Option<String>,
    pub output_format: Option<String>,
    /// --note: 会話開始前に入れるシステムメモ（複数可）
    pub notes: Vec<String>,
    pub transcript: Option<PathBuf>,
    pub diagram_dir: PathBuf,
    pub diagram_format: DiagramFormat,
    pub provider: ProviderType,
    /// --no-diagrams: 応答中の図を描画しない
    pub no_diagrams: bool,
    /// --no-interactive: API キーを対話で尋ねない
    pub non_interactive: bool,
    /// --log-file: JSONL ログの出力先（未指定なら UMLCHAT_LOG_FILE）
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help: false,
            model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
            memory: DEFAULT_MAX_MESSAGES as i64,
            system_prompt: None,
            output_format: None,
            notes: Vec::new(),
            transcript: None,
            diagram_dir: PathBuf::from(DEFAULT_DIAGRAM_DIR),
            diagram_format: DiagramFormat::default(),
            provider: ProviderType::default(),
            no_diagrams: false,
            non_interactive: false,
            log_file: None,
        }
    }
}

impl Config {
    /// --memory をメモリ上限に変換する（0 は無制限）
    pub fn memory_limit(&self) -> Option<i64> {
        (self.memory != 0).then_some(self.memory)
    }

    /// モデル設定を組み立てる。タイムアウトは正の有限値のみ受け付ける。
    pub fn model_config(&self) -> Result<ModelConfig, Error> {
        let timeout = match self.timeout {
            None => None,
            Some(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
            Some(secs) => {
                return Err(Error::invalid_argument(format!(
                    "--timeout must be a positive number of seconds (got {})",
                    secs
                )))
            }
        };
        Ok(ModelConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout,
            max_retries: self.max_retries,
        })
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("umlchat")
        .about("Chat with a Groq model that remembers recent context and draws PlantUML diagrams")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("model")
                .long("model")
                .value_name("model")
                .help(format!(
                    "Groq chat model to use (common choices: {})",
                    GROQ_TEXT_MODELS.join(", ")
                ))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("temperature")
                .long("temperature")
                .value_name("value")
                .help("Sampling temperature for the model")
                .value_parser(value_parser!(f32))
                .allow_negative_numbers(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-tokens")
                .long("max-tokens")
                .value_name("n")
                .help("Optional cap on generated tokens")
                .value_parser(value_parser!(u32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("timeout")
                .long("timeout")
                .value_name("seconds")
                .help("Request timeout in seconds")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-retries")
                .long("max-retries")
                .value_name("n")
                .help("Retry attempts for Groq API calls")
                .value_parser(value_parser!(u32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("memory")
                .long("memory")
                .value_name("n")
                .help("How many recent messages to retain in memory (0 for unlimited)")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("system-prompt")
                .long("system-prompt")
                .value_name("text")
                .help("Custom system prompt for the agent persona")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("output-format")
                .long("output-format")
                .value_name("text")
                .help("Extra instructions describing the desired output style")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("note")
                .long("note")
                .value_name("text")
                .help("Inject an additional system note before the chat (repeatable)")
                .action(ArgAction::Append)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("transcript")
                .long("transcript")
                .value_name("path")
                .help("Save the conversation transcript to this path when exiting")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("diagram-dir")
                .long("diagram-dir")
                .value_name("dir")
                .help("Directory where generated PlantUML diagrams are written")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("diagram-format")
                .long("diagram-format")
                .value_name("format")
                .help("Image format to request from the PlantUML server")
                .value_parser(["png", "svg"])
                .num_args(1),
        )
        .arg(
            clap::Arg::new("provider")
                .long("provider")
                .value_name("provider")
                .help("Model provider (echo works offline)")
                .value_parser(["groq", "echo"])
                .num_args(1),
        )
        .arg(
            clap::Arg::new("no-diagrams")
                .long("no-diagrams")
                .help("Do not render diagrams found in replies")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("no-interactive")
                .long("no-interactive")
                .help("Never prompt for the API key")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("log-file")
                .long("log-file")
                .value_name("path")
                .help("Append JSONL logs to this file")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let defaults = Config::default();
    Config {
        help: matches.get_flag("help"),
        model: matches
            .get_one::<String>("model")
            .cloned()
            .unwrap_or(defaults.model),
        temperature: matches
            .get_one::<f32>("temperature")
            .copied()
            .unwrap_or(defaults.temperature),
        max_tokens: matches.get_one::<u32>("max-tokens").copied(),
        timeout: matches.get_one::<f64>("timeout").copied(),
        max_retries: matches
            .get_one::<u32>("max-retries")
            .copied()
            .unwrap_or(defaults.max_retries),
        memory: matches
            .get_one::<i64>("memory")
            .copied()
            .unwrap_or(defaults.memory),
        system_prompt: matches.get_one::<String>("system-prompt").cloned(),
        output_format: matches.get_one::<String>("output-format").cloned(),
        notes: matches
            .get_many::<String>("note")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
        transcript: matches.get_one::<PathBuf>("transcript").cloned(),
        diagram_dir: matches
            .get_one::<PathBuf>("diagram-dir")
            .cloned()
            .unwrap_or(defaults.diagram_dir),
        diagram_format: matches
            .get_one::<String>("diagram-format")
            .and_then(|s| DiagramFormat::from_str(s))
            .unwrap_or(defaults.diagram_format),
        provider: matches
            .get_one::<String>("provider")
            .and_then(|s| ProviderType::from_str(s))
            .unwrap_or(defaults.provider),
        no_diagrams: matches.get_flag("no-diagrams"),
        non_interactive: matches.get_flag("no-interactive"),
        log_file: matches.get_one::<PathBuf>("log-file").cloned(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "umlchat", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("umlchat")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_args_no_args_uses_defaults() {
        let config = parse_args_from(&args(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model, DEFAULT_GROQ_MODEL);
        assert_eq!(config.memory, 20);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.diagram_dir, PathBuf::from("diagrams"));
        assert_eq!(config.diagram_format, DiagramFormat::Png);
        assert_eq!(config.provider, ProviderType::Groq);
    }

    #[test]
    fn test_parse_args_help_short_and_long() {
        assert!(parse_args_from(&args(&["-h"])).unwrap().help);
        assert!(parse_args_from(&args(&["--help"])).unwrap().help);
    }

    #[test]
    fn test_parse_args_all_options() {
        let config = parse_args_from(&args(&[
            "--model",
            "llama-3.1-8b-instant",
            "--temperature",
            "0.7",
            "--max-tokens",
            "512",
            "--timeout",
            "2.5",
            "--max-retries",
            "0",
            "--memory",
            "6",
            "--system-prompt",
            "You are terse.",
            "--output-format",
            "Markdown only",
            "--note",
            "first",
            "--note",
            "second",
            "--transcript",
            "out/chat.txt",
            "--diagram-dir",
            "uml",
            "--diagram-format",
            "svg",
            "--provider",
            "echo",
            "--no-diagrams",
            "--no-interactive",
            "--log-file",
            "log.jsonl",
        ]))
        .unwrap();
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.timeout, Some(2.5));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.memory, 6);
        assert_eq!(config.system_prompt.as_deref(), Some("You are terse."));
        assert_eq!(config.output_format.as_deref(), Some("Markdown only"));
        assert_eq!(config.notes, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(config.transcript, Some(PathBuf::from("out/chat.txt")));
        assert_eq!(config.diagram_dir, PathBuf::from("uml"));
        assert_eq!(config.diagram_format, DiagramFormat::Svg);
        assert_eq!(config.provider, ProviderType::Echo);
        assert!(config.no_diagrams);
        assert!(config.non_interactive);
        assert_eq!(config.log_file, Some(PathBuf::from("log.jsonl")));
    }

    #[test]
    fn test_parse_args_rejects_unknown_and_bad_values() {
        for bad in [
            vec!["--unknown"],
            vec!["-x"],
            vec!["--diagram-format", "gif"],
            vec!["--provider", "gemini"],
            vec!["--max-tokens", "lots"],
            vec!["positional"],
        ] {
            let err = parse_args_from(&args(&bad)).unwrap_err();
            assert_eq!(err.exit_code(), 64, "{:?}", bad);
        }
    }

    #[test]
    fn test_memory_limit() {
        let mut config = parse_args_from(&args(&["--memory", "0"])).unwrap();
        assert_eq!(config.memory_limit(), None);
        config.memory = 5;
        assert_eq!(config.memory_limit(), Some(5));
        let config = parse_args_from(&args(&["--memory", "-3"])).unwrap();
        assert_eq!(config.memory_limit(), Some(-3));
    }

    #[test]
    fn test_model_config() {
        let config = parse_args_from(&args(&["--timeout", "1.5", "--max-tokens", "64"])).unwrap();
        let mc = config.model_config().unwrap();
        assert_eq!(mc.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(mc.max_tokens, Some(64));
        assert_eq!(mc.model, DEFAULT_GROQ_MODEL);

        let config = parse_args_from(&args(&["--timeout", "-1"])).unwrap();
        let err = config.model_config().unwrap_err();
        assert!(err.is_usage());
        assert!(err.to_string().contains("--timeout"));
    }
}
