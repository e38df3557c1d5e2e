use marker_map::features::read_feature_collection;
use marker_map::geo::LatLngBounds;
use marker_map::initializer::{InitReport, MapInitializer, MapOptions, FIT_PADDING};
use marker_map::map::{HeadlessMap, Viewport};
use marker_map::markers::{json_script, marker_collection, read_markers};
use marker_map::source::{FeatureSource, GeoJsonFile, PageElement};

use std::path::PathBuf;

use log::info;
use serde::Serialize;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "marker-map")]
enum Opt {
    /// Initializes a headless map from a geojson file or an html page and
    /// prints the resulting layers and view
    Render {
        /// .geojson/.json FeatureCollection, or an .html page embedding one
        input: PathBuf,
        /// Id of the script element holding the data in an html page
        #[structopt(long, default_value = "marker_data")]
        element_id: String,
        /// Width of the map in pixels
        #[structopt(long, default_value = "1024")]
        width: f64,
        /// Height of the map in pixels
        #[structopt(long, default_value = "768")]
        height: f64,
        /// Reserved map options as a json object
        #[structopt(long, default_value = "{}")]
        options: String,
    },
    /// Prints the script element embedding a FeatureCollection into a page
    Embed {
        /// File containing the FeatureCollection
        geojson_file: PathBuf,
        #[structopt(long, default_value = "marker_data")]
        element_id: String,
    },
    /// Builds the marker collection from a json list of records and prints
    /// its script element
    Markers {
        /// File containing `[{"name", "url", "location": {"lat", "lng"}}]` records
        records_file: PathBuf,
        #[structopt(long, default_value = "marker_data")]
        element_id: String,
    },
}

#[derive(Serialize)]
struct RenderOutput {
    report: InitReport,
    viewport: Viewport,
    visible: LatLngBounds,
    popups: Vec<Option<String>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    match Opt::from_args() {
        Opt::Render {
            input,
            element_id,
            width,
            height,
            options,
        } => {
            let options: MapOptions = serde_json::from_str(&options)?;
            let source = load_source(input, &element_id)?;

            let mut map = HeadlessMap::new(width, height);
            let report = MapInitializer::new(options).initialize(&mut map, source.as_ref())?;

            let popups = map
                .layer_groups()
                .flat_map(|g| g.iter())
                .map(|f| f.popup().map(|p| p.content.clone()))
                .collect();

            let output = RenderOutput {
                report,
                viewport: map.viewport().clone(),
                visible: map.viewport().inner_bounds(FIT_PADDING),
                popups,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Opt::Embed {
            geojson_file,
            element_id,
        } => {
            let collection = read_feature_collection(geojson_file)?;
            println!("{}", json_script(&collection, &element_id)?);
        }
        Opt::Markers {
            records_file,
            element_id,
        } => {
            let markers = read_markers(records_file)?;
            let collection = marker_collection(&markers);
            info!(
                "{} of {} records have a location",
                collection.features.len(),
                markers.len()
            );
            println!("{}", json_script(&collection, &element_id)?);
        }
    }
    Ok(())
}

fn load_source(
    input: PathBuf,
    element_id: &str,
) -> Result<Box<dyn FeatureSource>, Box<dyn std::error::Error>> {
    let is_page = input
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));

    if is_page {
        info!("reading page {}", input.display());
        let html = std::fs::read_to_string(&input)?;
        Ok(Box::new(PageElement::new(html, element_id)))
    } else {
        info!("reading geojson {}", input.display());
        Ok(Box::new(GeoJsonFile(input)))
    }
}
