//! Example: Aggregated stats and streak for a Last.fm user.
//!
//! Run with: cargo run --example user_stats -- <username>
//!
//! Requires LASTFM_API_KEY (a .env file is read if present).

use scrobble_stats::config::Config;
use scrobble_stats::service::StatsService;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = std::env::args().nth(1).unwrap_or_else(|| "rj".to_string());
    let config = Config::from_env();
    let service = StatsService::from_config(&config);

    let stats = service.get_user_stats(&username).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    // Second call is served from the stats cache.
    let cached = service.get_user_stats(&username).await?;
    println!("Cached total: {}", cached.total_scrobbles);

    let streak = service.get_streak(&username).await?;
    match (streak.start_date, streak.end_date) {
        (Some(start), Some(end)) => println!("Streak: {} days ({} to {})", streak.days, start, end),
        _ => println!("No scrobbles yet"),
    }

    Ok(())
}
