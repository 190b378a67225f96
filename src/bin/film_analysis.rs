use anyhow::Result;
use cleanse::{datasets::bond, logging};

fn main() -> Result<()> {
    logging::init();
    let report = bond::DATASET.run()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
