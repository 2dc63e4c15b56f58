pub mod cli;
pub mod client;
pub mod llm;
pub mod models;
pub mod server;

use cli::Args;
use llm::gemini::GeminiClient;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Preferred Port: {}", args.port);
    info!("Port File: {}", args.port_file);
    info!("Gemini Model: {}", args.gemini_model);
    info!("Gemini Base URL: {}", args.gemini_base_url);
    info!("-------------------------");

    let provider = Arc::new(GeminiClient::new(
        args.gemini_api_key.clone(),
        args.gemini_model.clone(),
        args.gemini_base_url.clone(),
    ));

    let server = Server::new(args.port, args.port_file.clone(), provider);
    server.run().await
}
