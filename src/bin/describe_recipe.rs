use cleanse::datasets;
use std::{env, process::exit};

fn main() {
    // Expect exactly one CLI argument: the dataset name.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        let names: Vec<&str> = datasets::ALL.iter().map(|d| d.name).collect();
        eprintln!("Usage: {} <{}>", args[0], names.join("|"));
        exit(1);
    }

    let Some(dataset) = datasets::by_name(&args[1]) else {
        eprintln!("Error: unknown dataset `{}`", args[1]);
        exit(1);
    };

    println!("# source: {}", dataset.source);
    println!("# output: {}", dataset.output);
    match serde_yaml::to_string(&(dataset.recipe)()) {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}
