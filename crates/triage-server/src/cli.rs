use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "triage-server")]
#[command(about = "Support ticket triage API", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "triage.yaml", env = "TRIAGE_CONFIG")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
