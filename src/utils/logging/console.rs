//! Console output utilities
//!
//! Human-readable summaries go to stderr so that stdout stays machine-readable.

use std::time::Duration;

use crate::error::Result;
use crate::models::RafResult;

/// Print a summary of a scored batch
pub fn print_batch_summary(results: &[Result<RafResult>], elapsed: Duration) {
    let scored: Vec<&RafResult> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let failed = results.len() - scored.len();

    eprintln!("Scored {} members in {:?}", scored.len(), elapsed);
    if failed > 0 {
        eprintln!("Rejected {failed} members with invalid input");
    }
    if scored.is_empty() {
        return;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = scored.iter().map(|r| r.risk_score).sum::<f64>() / scored.len() as f64;
    let with_hccs = scored.iter().filter(|r| !r.cc_list.is_empty()).count();
    eprintln!("Mean risk score: {mean:.4}");
    eprintln!("Members with at least one HCC: {with_hccs}");
}
