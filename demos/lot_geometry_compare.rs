//! Requests the same parcel boundary in MGA94 and MGA2020 zone 56 and
//! compares the first vertex.
//!
//! The cadastre is slow at times and can fail intermittently; one of the two
//! requests may come back empty. Re-running usually helps. With this query
//! method both projections often return identical coordinates.

use std::{
    future::Future,
    io::{self, Write},
};

use nswspatial::{LotGeometry, NswSpatialClient, RetryPolicy};

const EPSG_MGA94_56: u32 = 28356;
const EPSG_MGA2020_56: u32 = 7856;
const MAX_POINTS: usize = 12;

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

/// Runs a cadastre call, printing a friendly message instead of failing.
async fn run_cadastre_call<T, F>(label: &str, call: F) -> Option<T>
where
    F: Future<Output = nswspatial::Result<T>>,
{
    match call.await {
        Ok(value) => Some(value),
        Err(err) if err.is_transient() => {
            println!("\n[WARN] {label}: the service did not respond in time ({err}).");
            None
        }
        Err(err) => {
            println!("\n[WARN] {label}: {err}");
            println!("       NSW ArcGIS errors are often transient; try again.");
            None
        }
    }
}

fn print_boundary(label: &str, geometry: &LotGeometry) {
    let Some(ring) = geometry.rings.first() else {
        println!("\n{label}: [no geometry returned]");
        return;
    };

    println!("\n{label} (showing up to {MAX_POINTS} points):");
    for (index, [e, n]) in ring.iter().take(MAX_POINTS).enumerate() {
        println!("  {:02}: {e:.3}, {n:.3}", index + 1);
    }
    if ring.len() > MAX_POINTS {
        println!("  ... ({} points total in first boundary)", ring.len());
    }
}

fn round_mm(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let address = prompt("Enter street address (e.g. 39 RYAN ST): ")?;
    let suburb = prompt("Enter suburb: ")?;
    let postcode = prompt("Enter postcode (optional): ")?;

    let address = address.split_whitespace().collect::<Vec<_>>().join(" ");
    let suburb = suburb.split_whitespace().collect::<Vec<_>>().join(" ");
    let number = address.split_whitespace().next().unwrap_or_default();

    let client = NswSpatialClient::from_env()?;
    let retrying = {
        let mut options = client.options().clone();
        options.transient_service_messages = RetryPolicy::KNOWN_TRANSIENT_SERVICE_MESSAGES
            .iter()
            .map(|message| (*message).to_owned())
            .collect();
        client.clone().with_options(options)
    };

    let matched = match client
        .address_to_point(&address, Some(suburb.as_str()), Some(postcode.as_str()))
        .await
    {
        Ok(Some(matched)) => matched,
        outcome => {
            println!("\nNo address found.");
            if let Err(err) = outcome {
                println!("Details: {err}");
            }
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

    let mga94 = run_cadastre_call(
        &format!("Geometry (identify) EPSG:{EPSG_MGA94_56}"),
        retrying.lot_geometry_mga_from_point(matched.lon, matched.lat, EPSG_MGA94_56),
    )
    .await
    .unwrap_or_default();
    let mga2020 = run_cadastre_call(
        &format!("Geometry (identify) EPSG:{EPSG_MGA2020_56}"),
        retrying.lot_geometry_mga_from_point(matched.lon, matched.lat, EPSG_MGA2020_56),
    )
    .await
    .unwrap_or_default();

    if mga94.is_empty() {
        println!("\n[WARN] No geometry returned for MGA94 (EPSG:{EPSG_MGA94_56}).");
    } else {
        print_boundary(&format!("MGA94 Zone 56 (EPSG:{EPSG_MGA94_56})"), &mga94);
    }
    if mga2020.is_empty() {
        println!("\n[WARN] No geometry returned for MGA2020 (EPSG:{EPSG_MGA2020_56}).");
    } else {
        print_boundary(&format!("MGA2020 Zone 56 (EPSG:{EPSG_MGA2020_56})"), &mga2020);
    }

    let (Some(p94), Some(p20)) = (mga94.first_point(), mga2020.first_point()) else {
        println!("\nComparison skipped (need both geometries). Try running again.");
        return Ok(());
    };

    let same_mm = (round_mm(p94[0]), round_mm(p94[1])) == (round_mm(p20[0]), round_mm(p20[1]));

    println!("\nComparison:");
    println!("  First point MGA94  : {:.3}, {:.3}", p94[0], p94[1]);
    println!("  First point MGA2020: {:.3}, {:.3}", p20[0], p20[1]);
    println!("  Identical to 0.001m?: {}", if same_mm { "YES" } else { "NO" });

    println!("\nObservation:");
    if same_mm {
        println!("  MGA94 and MGA2020 outputs are identical to 0.001 m (with this method).");
    } else {
        println!("  MGA94 and MGA2020 outputs differ (datum shift appears to be applied).");
    }

    Ok(())
}
