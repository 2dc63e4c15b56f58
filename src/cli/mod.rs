use crate::llm::gemini::{ DEFAULT_BASE_URL, DEFAULT_MODEL };
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// API key for the Gemini generateContent endpoint.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "")]
    pub gemini_api_key: String,

    /// Model name for chat completion.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Base URL for the Gemini API.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Preferred listening port. When occupied, the server walks up to the
    /// next free port.
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// File the bound port number is written to, for co-located tooling.
    #[arg(long, env = "PORT_FILE", default_value = "relay-port.json")]
    pub port_file: String,
}
