//! Line-driven renderer: each line becomes a request, and the results
//! table is reprinted whenever `search/view` settles.

use std::io::BufRead;

use anyhow::Result;
use scout_bff::request::*;
use scout_bff::state::{DomainTraceState, EmailFinderState, LocationState, ResultsView, RevealField, Viewport};
use scout_core::{FilterField, LatLon, RevealKind, ScoutConfig};
use tokio::sync::mpsc;
use tracing::warn;

use super::verifier::{print_finder, print_trace};
use super::{print_results, Session};

const HELP: &str = "\
set <field> [value]        edit a filter; searches after a pause
search                     search now
next | prev                change page
page <n>                   jump to page n
clear                      reset filters and results
reveal <id> <kind>         toggle email, phone or relationship
click <lat> <lon>          pick the place under a map click
marker <name>              pick a city marker
dept <code>                pick a department
zoom in | zoom out         change the map zoom
locale <fr|en>             switch language
find <first> <last> <domain>
trace <domain>
view                       print the current results
quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Set(FilterField, String),
    Search,
    Next,
    Previous,
    Page(u32),
    Clear,
    Reveal(String, RevealKind),
    Click(LatLon),
    Marker(String),
    Department(String),
    ZoomIn,
    ZoomOut,
    Locale(String),
    Find(String, String, String),
    Trace(String),
    View,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<Line>> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let parsed = match (cmd, args.as_slice()) {
        ("", _) => return Ok(None),
        ("set", [field, ..]) => {
            let value = rest[field.len()..].trim();
            Line::Set(field.parse()?, value.to_string())
        }
        ("search", []) => Line::Search,
        ("next", []) => Line::Next,
        ("prev" | "previous", []) => Line::Previous,
        ("page", [n]) => Line::Page(n.parse()?),
        ("clear", []) => Line::Clear,
        ("reveal", [id, kind]) => Line::Reveal(id.to_string(), kind.parse()?),
        ("click", [lat, lon]) => Line::Click(LatLon::new(lat.parse()?, lon.parse()?)),
        ("marker", [_, ..]) => Line::Marker(rest.to_string()),
        ("dept", [code]) => Line::Department(code.to_string()),
        ("zoom", ["in"]) => Line::ZoomIn,
        ("zoom", ["out"]) => Line::ZoomOut,
        ("locale", [locale]) => Line::Locale(locale.to_string()),
        ("find", [first, last, domain]) => Line::Find(first.to_string(), last.to_string(), domain.to_string()),
        ("trace", [domain]) => Line::Trace(domain.to_string()),
        ("view", []) => Line::View,
        ("help" | "?", _) => Line::Help,
        ("quit" | "exit", _) => Line::Quit,
        _ => anyhow::bail!("unrecognized input, type `help`"),
    };
    Ok(Some(parsed))
}

pub async fn run(cfg: &ScoutConfig) -> Result<()> {
    let mut session = Session::new(cfg).with_people(cfg)?.with_location(cfg)?;
    let verifier = cfg.endpoints.require_verifier_url().is_ok();
    if verifier {
        session = session.with_verifier(cfg)?;
    }
    let session = session.start().await;

    session.flux.subscribe(ResultsView::PATH, |_, value| {
        if let Some(view) = value.downcast_ref::<ResultsView>() {
            if !view.loading {
                print_results(view);
            }
        }
    });

    // Stdin is blocking; feed lines from a dedicated thread.
    let (tx, mut rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    println!("Type `help` for commands.");
    while let Some(input) = rx.recv().await {
        let line = match parse_line(&input) {
            Ok(Some(line)) => line,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        let flux = &session.flux;
        match line {
            Line::Set(field, value) => {
                flux.emit(SetFieldReq::PATH, SetFieldReq::new(field, value)).await;
            }
            Line::Search => {
                flux.emit(SubmitSearchReq::PATH, SubmitSearchReq).await;
            }
            Line::Next => {
                flux.emit(NextPageReq::PATH, NextPageReq).await;
            }
            Line::Previous => {
                flux.emit(PreviousPageReq::PATH, PreviousPageReq).await;
            }
            Line::Page(n) => {
                let index = n.saturating_sub(1);
                flux.emit(GoToPageReq::PATH, GoToPageReq { index }).await;
            }
            Line::Clear => {
                flux.emit(ClearSearchReq::PATH, ClearSearchReq).await;
            }
            Line::Reveal(id, kind) => {
                flux.emit(ToggleRevealReq::PATH, ToggleRevealReq::new(&id, kind)).await;
                if let Ok(cell) = session.state::<RevealField>(&RevealField::path(&id, kind)) {
                    println!("{kind} of {id}: {}", cell.display(kind));
                }
            }
            Line::Click(at) => {
                flux.emit(MapClickReq::PATH, MapClickReq { at }).await;
                print_location(&session);
            }
            Line::Marker(name) => {
                flux.emit(SelectMarkerReq::PATH, SelectMarkerReq { name }).await;
                print_location(&session);
            }
            Line::Department(code) => {
                flux.emit(SelectDepartmentReq::PATH, SelectDepartmentReq { code }).await;
                print_location(&session);
            }
            Line::ZoomIn => {
                flux.emit(ZoomInReq::PATH, ZoomInReq).await;
                print_viewport(&session);
            }
            Line::ZoomOut => {
                flux.emit(ZoomOutReq::PATH, ZoomOutReq).await;
                print_viewport(&session);
            }
            Line::Locale(locale) => {
                flux.emit(SetLocaleReq::PATH, SetLocaleReq { locale }).await;
            }
            Line::Find(first_name, last_name, domain) if verifier => {
                flux.emit(FindEmailsReq::PATH, FindEmailsReq { first_name, last_name, domain }).await;
                if let Ok(state) = session.state::<EmailFinderState>(EmailFinderState::PATH) {
                    match (state.error, state.result) {
                        (Some(err), _) => println!("{err}"),
                        (None, Some(result)) => print_finder(&result),
                        (None, None) => {}
                    }
                }
            }
            Line::Trace(domain) if verifier => {
                flux.emit(TraceDomainReq::PATH, TraceDomainReq { domain }).await;
                if let Ok(state) = session.state::<DomainTraceState>(DomainTraceState::PATH) {
                    match (state.error, state.result) {
                        (Some(err), _) => println!("{err}"),
                        (None, Some(result)) => print_trace(&result),
                        (None, None) => {}
                    }
                }
            }
            Line::Find(..) | Line::Trace(_) => {
                warn!("verifier not configured");
                println!("Set endpoints.verifier_url to use the email tools.");
            }
            Line::View => {
                if let Ok(view) = session.state::<ResultsView>(ResultsView::PATH) {
                    print_results(&view);
                }
            }
            Line::Help => println!("{HELP}"),
            Line::Quit => break,
        }
    }
    Ok(())
}

fn print_location(session: &Session) {
    match session.state::<LocationState>(LocationState::PATH) {
        Ok(LocationState { selected: Some(location), .. }) => println!("Selected {}", location.name()),
        _ => println!("Nothing selected."),
    }
}

fn print_viewport(session: &Session) {
    if let Ok(v) = session.state::<Viewport>(Viewport::PATH) {
        println!("zoom {:.2} at {:.4}, {:.4}", v.zoom, v.center.lat, v.center.lon);
    }
}
