#[tokio::main]
async fn main() {
    if let Err(e) = vault_ai_lib::run().await {
        log::error!("{}", e);
        eprintln!("vault-ai: {}", e);
        std::process::exit(1);
    }
}
