//! Configurator server binary. See the library crate for the details.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    configurator_server::run().await
}
