use anyhow::Result;
use scout_bff::request::{FindEmailsReq, TraceDomainReq};
use scout_bff::state::{DomainTraceState, EmailFinderState};
use scout_client::{DomainTraceResult, EmailFinderResult};
use scout_core::ScoutConfig;

use super::{print_json, Session};
use crate::Output;

pub async fn find_email(cfg: &ScoutConfig, first_name: &str, last_name: &str, domain: &str, output: Output) -> Result<()> {
    let session = Session::new(cfg).with_verifier(cfg)?.start().await;
    let req = FindEmailsReq {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        domain: domain.to_string(),
    };
    session.flux.emit(FindEmailsReq::PATH, req).await;

    let state: EmailFinderState = session.state(EmailFinderState::PATH)?;
    if let Some(err) = state.error {
        anyhow::bail!("{err}");
    }
    let Some(result) = state.result else {
        anyhow::bail!("email finder returned nothing");
    };

    match output {
        Output::Json => print_json(&result)?,
        Output::Table => print_finder(&result),
    }
    Ok(())
}

pub fn print_finder(result: &EmailFinderResult) {
    for line in &result.progress {
        println!("  {line}");
    }
    println!();
    if result.valid_emails.is_empty() {
        println!("No valid address found.");
    }
    for email in &result.valid_emails {
        println!("{email}");
    }
    println!("({:.1}s)", result.elapsed_time);
}

pub async fn trace(cfg: &ScoutConfig, domain: &str, output: Output) -> Result<()> {
    let session = Session::new(cfg).with_verifier(cfg)?.start().await;
    session
        .flux
        .emit(TraceDomainReq::PATH, TraceDomainReq { domain: domain.to_string() })
        .await;

    let state: DomainTraceState = session.state(DomainTraceState::PATH)?;
    if let Some(err) = state.error {
        anyhow::bail!("{err}");
    }
    let Some(result) = state.result else {
        anyhow::bail!("domain trace returned nothing");
    };

    match output {
        Output::Json => print_json(&result)?,
        Output::Table => print_trace(&result),
    }
    Ok(())
}

pub fn print_trace(result: &DomainTraceResult) {
    println!("{:40} {:6} REASON", "EMAIL", "VALID");
    for check in &result.results {
        let valid = if check.valid { "yes" } else { "no" };
        println!("{:40} {:6} {}", check.email, valid, check.reason.as_deref().unwrap_or("-"));
    }
    println!();
    println!("{} valid of {} checked", result.valid_emails.len(), result.results.len());
}
