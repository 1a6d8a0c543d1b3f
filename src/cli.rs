use clap::Parser;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "toolchat")]
#[command(
    about = "Chat assistant that can look up current weather and stock prices",
    long_about = None
)]
pub struct Args {
    #[arg(
        long = "api-endpoint",
        help = "Custom chat API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(short = 'm', long = "model", help = "Chat model identifier")]
    pub model: Option<String>,

    #[arg(
        long = "max-tool-rounds",
        help = "Maximum tool round-trips per user turn"
    )]
    pub max_tool_rounds: Option<usize>,

    #[arg(long = "no-tools", help = "Disable weather and stock tools")]
    pub no_tools: bool,

    #[arg(short = 'v', long = "verbose", help = "Log diagnostics to stderr")]
    pub verbose: bool,

    #[arg(
        long = "config-init",
        help = "Write a sample config file to ~/.config/toolchat/toolchat.yaml"
    )]
    pub config_init: bool,

    #[arg(help = "Ask a single question and exit instead of starting a chat")]
    pub prompt: Vec<String>,
}
