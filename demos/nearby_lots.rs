//! Finds lots near an address.
//!
//! Address positions are approximate and the distance search is GIS based,
//! not survey-accurate adjacency.

use nswspatial::NswSpatialClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let number = "22";
    let street = "EASTBOURNE AVE";
    let suburb = "CLOVELLY";
    let postcode: Option<&str> = None;
    let search_distance_m = 30.0;

    let address = format!("{number} {street}");
    let client = NswSpatialClient::from_env()?;

    let matched = match client.address_to_point(&address, Some(suburb), postcode).await {
        Ok(Some(matched)) => matched,
        outcome => {
            println!("\nNo address found.");
            println!(
                "Tip: check spelling and try adding suburb + postcode, \
                 or abbreviations (ST vs STREET)."
            );
            if let Err(err) = outcome {
                println!("Details: {err}");
            }
            return Ok(());
        }
    };

    println!("\nInput address:   {address}, {suburb}");
    println!("Matched address: {}", matched.matched_address);
    if matched.is_fuzzy() {
        println!(
            "WARNING: {} possible address matches returned, fuzzy match used.",
            matched.match_count
        );
    }
    match matched.matched_house.as_deref() {
        Some(house) if matched.house_number_differs(number) => println!(
            "WARNING: Input house number '{number}' does not match returned '{house}'."
        ),
        Some(_) => {}
        None => println!("WARNING: No house number returned by address service."),
    }

    let lots = client
        .nearby_lots(matched.lon, matched.lat, search_distance_m)
        .await?;
    if lots.is_empty() {
        println!("\nNo lots found within {search_distance_m} m.");
        return Ok(());
    }

    println!("\nLots within {search_distance_m} m:");
    for lot in lots {
        println!("{lot}");
    }

    Ok(())
}
