use anyhow::{Context, Result};
use scout_bff::request::{GoToPageReq, SetFieldReq, SubmitSearchReq};
use scout_bff::state::ResultsView;
use scout_core::{FilterField, ScoutConfig};

use super::{print_json, print_results, Session};
use crate::Output;

/// Split `field=value`; the field name is matched case-insensitively.
pub fn parse_field(arg: &str) -> Result<(FilterField, String)> {
    let (name, value) = arg
        .split_once('=')
        .with_context(|| format!("expected FIELD=VALUE, got '{arg}'"))?;
    let field: FilterField = name.trim().parse()?;
    Ok((field, value.to_string()))
}

/// Zero-based index for a 1-based `--page`; `None` for the first page.
fn target_index(page: u32) -> Option<u32> {
    page.checked_sub(1).filter(|index| *index > 0)
}

pub async fn run(cfg: &ScoutConfig, fields: &[String], page: u32, output: Output) -> Result<()> {
    let filters = fields.iter().map(|f| parse_field(f)).collect::<Result<Vec<_>>>()?;
    if filters.iter().all(|(_, v)| v.trim().is_empty()) {
        anyhow::bail!("give at least one non-empty --field");
    }

    let session = Session::new(cfg).with_people(cfg)?.start().await;
    for (field, value) in filters {
        session.flux.emit(SetFieldReq::PATH, SetFieldReq::new(field, value)).await;
    }
    session.flux.emit(SubmitSearchReq::PATH, SubmitSearchReq).await;

    // The first response gives the total; jump from there.
    if let Some(index) = target_index(page) {
        let view: ResultsView = session.state(ResultsView::PATH)?;
        if view.error.is_none() && view.can_next {
            session.flux.emit(GoToPageReq::PATH, GoToPageReq { index }).await;
        }
    }

    let view: ResultsView = session.state(ResultsView::PATH)?;
    if let Some(err) = &view.error {
        anyhow::bail!("{err}");
    }
    match output {
        Output::Json => print_json(&view)?,
        Output::Table => print_results(&view),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_pairs() {
        let (field, value) = parse_field("currentcity=Saint-Étienne").unwrap();
        assert_eq!(field, FilterField::CurrentCity);
        assert_eq!(value, "Saint-Étienne");

        let (_, value) = parse_field("workplace=a=b").unwrap();
        assert_eq!(value, "a=b");
    }

    #[test]
    fn page_flag_maps_to_one_jump() {
        assert_eq!(target_index(0), None);
        assert_eq!(target_index(1), None);
        assert_eq!(target_index(2), Some(1));
        assert_eq!(target_index(40), Some(39));
    }

    #[test]
    fn rejects_bad_pairs() {
        assert!(parse_field("firstName").is_err());
        assert!(parse_field("shoeSize=42").is_err());
    }
}
