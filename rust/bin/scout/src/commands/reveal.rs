use anyhow::Result;
use scout_bff::request::ToggleRevealReq;
use scout_bff::state::{RevealField, RevealPhase};
use scout_core::{RevealKind, ScoutConfig};

use super::{print_json, Session};
use crate::Output;

pub async fn run(cfg: &ScoutConfig, user_id: &str, kind: &str, output: Output) -> Result<()> {
    let kind: RevealKind = kind.parse()?;
    let session = Session::new(cfg).with_people(cfg)?.start().await;

    session
        .flux
        .emit(ToggleRevealReq::PATH, ToggleRevealReq::new(user_id, kind))
        .await;

    let cell: RevealField = session.state(&RevealField::path(user_id, kind))?;
    if cell.phase != RevealPhase::Revealed {
        anyhow::bail!("could not reveal {kind} of user {user_id}");
    }
    match output {
        Output::Json => print_json(&cell)?,
        Output::Table => println!("{}", cell.display(kind)),
    }
    Ok(())
}
