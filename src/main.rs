use omerta::game;
use omerta::network::WebsocketServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    game::initialize_catalogs();
    println!("🎩 Starting Omerta match server...");
    let server = WebsocketServer::new("127.0.0.1:8080");
    server.run().await?;
    Ok(())
}
