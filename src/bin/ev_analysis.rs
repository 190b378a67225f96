use anyhow::Result;
use cleanse::{datasets::ev, logging};

fn main() -> Result<()> {
    logging::init();
    let report = ev::DATASET.run()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
