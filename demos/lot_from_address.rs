//! Prompts for an address, resolves it to a coordinate and prints the
//! Lot/Plan of the parcel(s) there.

use std::io::{self, Write};

use nswspatial::NswSpatialClient;

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let address = prompt("Enter street address (e.g. 39 RYAN ST): ")?;
    let suburb = prompt("Enter suburb: ")?;
    let postcode = prompt("Enter postcode (optional): ")?;

    let number = address.split_whitespace().next().unwrap_or_default();
    let client = NswSpatialClient::from_env()?;

    let matched = match client
        .address_to_point(&address, Some(suburb.as_str()), Some(postcode.as_str()))
        .await
    {
        Ok(Some(matched)) => matched,
        Ok(None) => {
            println!("\nNo address found.");
            return Ok(());
        }
        Err(err) => {
            println!("\nNo address found.");
            println!("Details: {err}");
            return Ok(());
        }
    };

    println!("\nInput:   {address}, {suburb}");
    println!("Matched: {}", matched.matched_address);
    if matched.is_fuzzy() {
        println!(
            "WARNING: {} possible address matches returned, fuzzy match used.",
            matched.match_count
        );
    }
    if matched.house_number_differs(number) {
        println!(
            "WARNING: Input house number '{number}' != matched '{}' (fuzzy match).",
            matched.matched_house.as_deref().unwrap_or_default()
        );
    }
    println!("\nAddress point (lon/lat): {}, {}", matched.lon, matched.lat);

    let hits = match client.lots_plans_from_point(matched.lon, matched.lat).await {
        Ok(hits) => hits,
        Err(err) => {
            println!("\n[ERROR] Cadastre query failed: {err}");
            if err.is_transient() {
                println!("        The service did not answer in time.");
            } else {
                println!("        This is often a transient NSW ArcGIS service error.");
            }
            println!("        Try running again, or try later.");
            return Ok(());
        }
    };

    match hits.as_slice() {
        [] => println!("\nNo parcels returned."),
        [hit] => println!("\nResult: {hit}"),
        hits => {
            println!("\nResult: {} parcels found:", hits.len());
            for hit in hits {
                println!("  {hit}");
            }
        }
    }

    Ok(())
}
