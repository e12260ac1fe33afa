pub mod config;
pub mod error;
pub mod format;
pub mod mailer;
pub mod model;
pub mod parser;

use tracing::{error, info};

use crate::{
    config::{EmailCredentials, SearchConfig},
    error::{DeliveryError, SearchError},
    mailer::Mailer,
    parser::PaperSource
};

#[derive(Debug)]
pub enum RunOutcome {
    NoMatches,
    Delivered(usize),
    DeliveryFailed(DeliveryError),
}

/// Searches once and mails the digest if anything matched.
///
/// Search failures abort the run. Delivery failures are reported and returned
/// as `RunOutcome::DeliveryFailed`.
pub fn run<S, M>(
    config: &SearchConfig,
    credentials: &EmailCredentials,
    source: &S,
    mailer: &M
) -> Result<RunOutcome, SearchError>
where
    S: PaperSource,
    M: Mailer,
{
    let papers = source.search(config)?;
    if papers.is_empty() {
        info!("No matching papers found.");
        return Ok(RunOutcome::NoMatches);
    }

    info!("# results: {}", papers.len());
    match mailer.send(credentials, &papers) {
        Ok(()) => {
            info!("Email sent successfully!");
            Ok(RunOutcome::Delivered(papers.len()))
        }
        Err(e) => {
            error!("Failed to send email: {}", e);
            Ok(RunOutcome::DeliveryFailed(e))
        }
    }
}
