//! Example: Basic usage of soup

use soup::{AttrValue, Filter, Property, Soup};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Menu</title></head>
<body>
  <ul id="menu">
    <li class="dish hot">Ramen</li>
    <li class="dish">Sushi</li>
    <li class="dish cold" data-seasonal>Soba</li>
  </ul>
  <p>No reservations <!--for now--></p>
</body>
</html>"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG=soup=debug for query traces)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let soup = Soup::new(PAGE);

    if let Property::Found(Some(title)) = soup.property("title")? {
        println!("Title: {}", title.own_text());
    }

    let dishes = soup.find_all(&Filter::tag("li").attr("class", "dish"))?;
    println!("{} dishes: {:?}", dishes.count(), dishes.to_strings());

    let hot = soup.find(&Filter::tag("li").attr("class", "hot"))?;
    if let Some(hot) = hot {
        println!("Hot: {hot}");
    }

    let regular = soup.find_all(&Filter::tag("li").attr("data-seasonal", AttrValue::Absent))?;
    println!("Served all year: {:?}", regular.to_strings());

    let strings = soup.find_all(&Filter::new().text(true))?;
    let words: Vec<String> = strings
        .to_strings()
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    println!("Strings: {words:?}");

    let last = soup.query("//ul/li[last()]")?;
    println!("Last item: {:?}", last.to_strings());

    Ok(())
}
