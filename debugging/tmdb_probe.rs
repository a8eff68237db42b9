//! Fetch one TMDB listing and print the cards the widget would draw.
//! Usage:
//!   cargo run --bin tmdb_probe -- popular
//!   cargo run --bin tmdb_probe -- search <text...>
//!   cargo run --bin tmdb_probe -- detail <index> [search text...]
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinegrid::config::Config;
use cinegrid::movie::{build_card, PLACEHOLDER_POSTER};
use cinegrid::tmdb::{Endpoint, TmdbApi, TmdbClient};
use dotenvy::dotenv;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "popular".to_string());

    let config = Config::from_env()?;
    let client = TmdbClient::new(&config)?;

    let (endpoint, detail_index) = match mode.as_str() {
        "popular" => (Endpoint::Popular, None),
        "search" => (Endpoint::for_input(&args.collect::<Vec<_>>().join(" ")), None),
        "detail" => {
            let index: usize = args
                .next()
                .context("detail needs a card index")?
                .parse()
                .context("card index must be a number")?;
            let text = args.collect::<Vec<_>>().join(" ");
            (Endpoint::for_input(&text), Some(index))
        }
        other => anyhow::bail!("unknown mode '{}': use popular, search or detail", other),
    };

    let page = client.fetch_page(&endpoint).await?;
    let movies = match page.into_movies() {
        Ok(movies) => movies,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    if let Some(index) = detail_index {
        match movies.get(index) {
            Some(movie) => println!("{}", build_card(index, movie, &config.image_base).detail.text),
            None => println!("No card at index {} ({} results)", index, movies.len()),
        }
        return Ok(());
    }

    for (i, movie) in movies.iter().enumerate() {
        let card = build_card(i, movie, &config.image_base);
        let poster = if card.poster_src == PLACEHOLDER_POSTER {
            "(placeholder poster)"
        } else {
            card.poster_src.as_str()
        };
        println!(
            "{:>2}. {} ({}) [{} {}]\n    {}",
            card.index,
            card.title,
            card.release_year,
            card.rating,
            card.rating_class,
            poster
        );
    }
    println!("{} results", movies.len());
    Ok(())
}
