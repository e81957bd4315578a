use anyhow::{Context, Result};
use hcc_raf::utils::logging::console::print_batch_summary;
use hcc_raf::utils::logging::{create_spinner, finish_and_clear};
use hcc_raf::{MemberRequest, RafCalculator, RafConfig};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::time::Instant;

/// Read one member request per non-empty line
fn read_requests(reader: impl BufRead) -> Result<Vec<MemberRequest>> {
    let mut requests = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read input line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let request: MemberRequest = serde_json::from_str(&line)
            .with_context(|| format!("Invalid member request on line {}", idx + 1))?;
        requests.push(request);
    }
    Ok(requests)
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RafConfig::from_env().context("Invalid RAF_* configuration")?;
    info!(
        "Using {} with reference tables from {}",
        config.model_name,
        config.data_dir.display()
    );

    let spinner = create_spinner(Some("Loading reference tables"));
    let calculator = RafCalculator::from_config(config)
        .context("Failed to load reference tables")?;
    finish_and_clear(&spinner);

    let requests = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("Failed to open {path}"))?;
            read_requests(BufReader::new(file))?
        }
        None => read_requests(io::stdin().lock())?,
    };
    if requests.is_empty() {
        warn!("No member requests on input");
        return Ok(());
    }

    let start = Instant::now();
    let results = calculator.calculate_batch(&requests)?;
    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (request, result) in requests.iter().zip(&results) {
        let line = match result {
            Ok(raf) => serde_json::json!({
                "member_id": request.member_id,
                "result": raf,
            }),
            Err(e) => serde_json::json!({
                "member_id": request.member_id,
                "error": e.to_string(),
            }),
        };
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    print_batch_summary(&results, elapsed);
    Ok(())
}
