//! Parallel batch scoring
//!
//! Members are independent, so a batch is a parallel map over requests on a
//! dedicated Rayon pool. Results come back in input order.

use indicatif::{ParallelProgressIterator, ProgressBar};
use log::{info, warn};
use rayon::prelude::*;
use std::time::Instant;

use crate::algorithm::raf::RafCalculator;
use crate::error::Result;
use crate::models::{MemberRequest, RafResult};
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

impl RafCalculator {
    /// Score many members in parallel
    ///
    /// # Arguments
    /// * `requests` - Members to score
    ///
    /// # Returns
    /// One result per request, in the same order. The outer error only
    /// reports a worker pool that could not be started.
    pub fn calculate_batch(&self, requests: &[MemberRequest]) -> Result<Vec<Result<RafResult>>> {
        let num_threads = self.config().threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;
        info!(
            "Scoring {} members using parallel processing with {num_threads} threads",
            requests.len()
        );

        let pb = if self.config().show_progress {
            create_main_progress_bar(requests.len() as u64, Some("Scoring members"))
        } else {
            ProgressBar::hidden()
        };

        let start = Instant::now();
        let results: Vec<Result<RafResult>> = pool.install(|| {
            requests
                .par_iter()
                .progress_with(pb.clone())
                .map(|request| self.calculate_request(request))
                .collect()
        });

        let failed = results.iter().filter(|r| r.is_err()).count();
        finish_progress_bar(&pb, Some("Scoring complete"));
        if failed > 0 {
            warn!("{failed} of {} members failed validation", requests.len());
        }
        info!(
            "Scored {} members in {:?}",
            requests.len() - failed,
            start.elapsed()
        );

        Ok(results)
    }
}
