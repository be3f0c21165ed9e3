//! Basic example demonstrating the FOSSology API client.
//!
//! Run with:
//! ```
//! FOSSOLOGY_TOKEN=your-token cargo run --example basic -- path/to/sources.zip
//! ```

use fossology::{
    Folder, FossologyClient, Get, LicenseQuery, List, Upload, UploadListQuery, UploadOptions,
    UploadSource,
};

#[tokio::main]
async fn main() -> fossology::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating FOSSology client...");
    let client = FossologyClient::from_env()?;
    println!("Connected to: {} (API {})", client.base_url(), client.version().await?);

    // Folders
    println!("\n--- Folders ---");
    let folders = Folder::list(&client).await?;
    for folder in &folders {
        println!("  - {} ({})", folder.name, folder.id);
    }
    let root = Folder::get(&client, 1).await?;

    // List first page of uploads
    println!("\n--- Listing Uploads (first page) ---");
    let uploads_page = Upload::list_page(&client, &UploadListQuery::default(), 1, 10).await?;
    println!(
        "Found {} uploads (pages: {:?})",
        uploads_page.len(),
        uploads_page.total_pages
    );

    for upload in &uploads_page {
        println!("  - {} ({})", upload.uploadname, upload.id);
    }

    // Upload a file if one was given on the command line
    let source = std::env::args().nth(1).map(|path| UploadSource::File(path.into()));
    let options = UploadOptions {
        description: Some("Uploaded by the basic example".to_string()),
        ..Default::default()
    };

    if let Some(upload) = Upload::create(&client, &root, source, &options).await? {
        println!("\n--- New Upload ---");
        println!("Upload: {} ({})", upload.uploadname, upload.id);
        println!("  Size: {:?}", upload.size());
        println!("  SHA1: {}", upload.sha1().unwrap_or("unknown"));

        println!("\n--- Summary ---");
        match upload.summary(&client).await {
            Ok(summary) => {
                println!("  Main license: {}", summary.main_license.as_deref().unwrap_or("none"));
                println!("  Files to clear: {}", summary.files_to_be_cleared);
            }
            Err(e) => println!("  Not available yet: {e}"),
        }

        println!("\n--- Licenses (first 5 files) ---");
        match upload.licenses(&client, &LicenseQuery::default()).await {
            Ok(findings) => {
                for finding in findings.iter().take(5) {
                    println!("  - {}: {}", finding.file_path, finding.scanner().join(", "));
                }
            }
            Err(e) => println!("  Not available yet: {e}"),
        }
    }

    println!("\nDone!");
    Ok(())
}
