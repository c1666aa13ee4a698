use log::{debug, info};

use crate::api::{LawDetail, LawSource, LawSummary, LookupKey};
use crate::error::{Result, TaxlawError};

/// Fetch the full text of a law by its ID. A 404 is retried exactly once
/// with the law number when the summary has one; no other failure is retried.
pub async fn fetch_detail<S>(source: &S, summary: &LawSummary) -> Result<LawDetail>
where
    S: LawSource + ?Sized,
{
    let primary = match source.fetch_law_data(&summary.law_id).await {
        Ok(body) => return Ok(LawDetail::new(body, LookupKey::LawId)),
        Err(e) if e.is_not_found() => e,
        Err(e) => return Err(e),
    };

    let Some(law_num) = summary.law_num.as_deref() else {
        debug!("{} not found and has no law number to fall back to", summary.law_id);
        return Err(primary);
    };

    info!(
        "{} not found by law ID, retrying with law number {}",
        summary.law_id, law_num
    );

    match source.fetch_law_data(law_num).await {
        Ok(body) => Ok(LawDetail::new(body, LookupKey::LawNum)),
        Err(fallback) => Err(TaxlawError::LookupFailed {
            law_id: summary.law_id.clone(),
            law_num: law_num.to_string(),
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }),
    }
}
