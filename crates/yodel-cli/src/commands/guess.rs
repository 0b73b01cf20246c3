use anyhow::{Context, Result};
use yodel_core::{guess_title, scrape};

pub async fn run(title: Option<&str>, url: Option<&str>) -> Result<()> {
    let raw = match (title, url) {
        (Some(title), _) => title.to_string(),
        (None, Some(url)) => {
            let client = scrape::http_client()?;
            match scrape::fetch_page_title(&client, url)
                .await
                .with_context(|| format!("Failed to fetch {}", url))?
            {
                Some(raw) => raw,
                None => {
                    println!("No og:title found on {}", url);
                    return Ok(());
                }
            }
        }
        (None, None) => anyhow::bail!("Give a title or --url"),
    };

    let guess = guess_title(&raw);

    println!("Page title: {}", guess.raw);
    println!("Artist:     {}", guess.artist);
    match guess.title {
        Some(ref title) => println!("Title:      {}", title),
        None => println!("Title:      (none)"),
    }

    Ok(())
}
