//! Example: Data behind the now-playing and chart widgets.
//!
//! Run with: cargo run --example widget_feeds -- <username> [period]

use scrobble_stats::config::Config;
use scrobble_stats::service::StatsService;
use scrobble_stats::types::Period;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let username = args.next().unwrap_or_else(|| "rj".to_string());
    let period: Period = match args.next() {
        Some(value) => value.parse()?,
        None => Period::SevenDays,
    };

    let service = StatsService::from_config(&Config::from_env());

    let playing = service.get_currently_playing(&username).await?;
    match &playing.track {
        Some(track) if playing.now_playing => {
            println!("Now playing: {} - {}", track.artist.name, track.name)
        }
        Some(track) => println!("Last played: {} - {}", track.artist.name, track.name),
        None => println!("Nothing played yet"),
    }

    println!("\nTop artists ({period}):");
    for artist in service.get_top_artists(&username, 5, period).await? {
        println!("  {:>6}  {}", artist.playcount, artist.name);
    }

    println!("\nTop tracks ({period}):");
    for track in service.get_top_tracks(&username, 5, period).await? {
        println!("  {:>6}  {} - {} [{}]", track.playcount, track.artist.name, track.name, track.image);
    }

    println!("\nTop albums ({period}):");
    for album in service.get_top_albums(&username, 5, period).await? {
        println!("  {:>6}  {} - {}", album.playcount, album.artist.name, album.name);
    }

    Ok(())
}
