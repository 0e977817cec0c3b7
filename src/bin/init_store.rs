use donation_tracker::config::Config;
use donation_tracker::db::{DonationStore, HEADER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let store = DonationStore::new(&config.donations_file);

    println!("Initializing donation store at {}...", store.path().display());

    if store.init().await? {
        println!("Created with header: {}", HEADER);
    } else {
        // Existing files are never rewritten; report what is there instead.
        let donations = store.list().await?;
        println!("Already present with {} donation(s). Left untouched.", donations.len());
    }

    Ok(())
}
