use anyhow::Result;
use cleanse::{datasets, logging};
use tracing::{error, info};

/// Cleanse and analyse every known dataset in the working directory.
fn main() -> Result<()> {
    logging::init();
    info!("startup");

    let mut failed = 0;
    for dataset in datasets::ALL {
        match dataset.run() {
            Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            Err(e) => {
                error!(dataset = dataset.name, "failed: {:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} datasets failed", failed, datasets::ALL.len());
    }
    info!("all done");
    Ok(())
}
