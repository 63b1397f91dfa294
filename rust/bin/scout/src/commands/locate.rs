use anyhow::Result;
use scout_bff::request::{MapClickReq, SelectDepartmentReq, SelectMarkerReq};
use scout_bff::state::{LocationState, ResultsView};
use scout_core::{LatLon, ScoutConfig, SelectedLocation};
use serde::Serialize;

use super::{print_json, print_results, Session};
use crate::Output;

#[derive(Debug, Clone, PartialEq)]
pub enum Pick {
    Click(f64, f64),
    Marker(String),
    Department(String),
}

#[derive(Serialize)]
struct Located<'a> {
    location: &'a SelectedLocation,
    results: &'a ResultsView,
}

pub async fn run(cfg: &ScoutConfig, pick: Pick, output: Output) -> Result<()> {
    let session = Session::new(cfg)
        .with_people(cfg)?
        .with_location(cfg)?
        .start()
        .await;

    match &pick {
        Pick::Click(lat, lon) => {
            let at = LatLon::new(*lat, *lon);
            session.flux.emit(MapClickReq::PATH, MapClickReq { at }).await;
        }
        Pick::Marker(name) => {
            session.flux.emit(SelectMarkerReq::PATH, SelectMarkerReq { name: name.clone() }).await;
        }
        Pick::Department(code) => {
            session
                .flux
                .emit(SelectDepartmentReq::PATH, SelectDepartmentReq { code: code.clone() })
                .await;
        }
    }

    let state: LocationState = session.state(LocationState::PATH)?;
    let Some(location) = state.selected else {
        anyhow::bail!("nothing selected for {pick:?}");
    };
    let view: ResultsView = session.state(ResultsView::PATH)?;
    if let Some(err) = &view.error {
        anyhow::bail!("{err}");
    }

    match output {
        Output::Json => print_json(&Located { location: &location, results: &view })?,
        Output::Table => {
            match &location {
                SelectedLocation::City { name, country } => println!("Location: {name}, {country}"),
                SelectedLocation::Department { name, code } => println!("Department: {name} ({code})"),
            }
            println!();
            print_results(&view);
        }
    }
    Ok(())
}
