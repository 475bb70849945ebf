//! Basic usage example for the Imbo client
//!
//! Run with: cargo run --example basic_usage
//!
//! Configure the server and keys through the IMBO_SERVER, IMBO_PUBLIC_KEY
//! and IMBO_PRIVATE_KEY environment variables.

use imbo_client::{Client, ImagesQuery};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    // Get server URL and keys from the environment
    let server_url =
        std::env::var("IMBO_SERVER").unwrap_or_else(|_| "http://localhost:9012".to_string());
    let public_key = std::env::var("IMBO_PUBLIC_KEY").unwrap_or_else(|_| "dev".to_string());
    let private_key = std::env::var("IMBO_PRIVATE_KEY").unwrap_or_else(|_| "dev-key".to_string());

    // Create client
    let client = Client::new(&server_url, &public_key, &private_key)?;

    // Check server status
    info!("Checking server status...");
    let status = client.server_status().await?;
    info!("Database: {}, storage: {}", status.database, status.storage);

    // Store an image
    info!("Storing an image...");
    let image_data = std::fs::read("image.png")?;
    let added = client.add_image(&image_data).await?;
    info!("Stored as {}", added.image_identifier);

    // Attach metadata to it
    info!("Attaching metadata...");
    let mut metadata = serde_json::Map::new();
    metadata.insert("category".to_string(), "demo".into());
    client
        .replace_metadata(&added.image_identifier, &metadata)
        .await?;

    // Inspect the stored image
    info!("Fetching image properties...");
    let properties = client.image_properties(&added.image_identifier).await?;
    info!(
        "{}x{} pixels, {} bytes, {}",
        properties.width, properties.height, properties.size, properties.mime_type
    );

    // List the user's images
    info!("Listing the five newest images...");
    let query = ImagesQuery::new().with_limit(5).with_return_metadata(true);
    for image in client.images(&query).await? {
        info!("  - {} ({:?})", image.image_identifier, image.mime);
    }

    // Count images
    let count = client.num_images().await?;
    info!("User has {} images", count);

    // Delete the image again
    info!("Deleting the image...");
    let deleted = client.delete_image(&added.image_identifier).await?;
    info!("Deleted: {}", deleted);

    info!("Example completed successfully!");
    Ok(())
}
