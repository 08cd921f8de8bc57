//! Read a single path from a configuration file.

use cfgtree::config::Item;

use crate::cli::GetArgs;
use crate::commands::load;
use crate::output::{OutputFormat, human_value, item_to_json};

/// Run the get command
pub fn run(args: &GetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(&args.file)?;
    let item = config.get_path(&args.path)?;
    match (format, &item) {
        (OutputFormat::Human, Item::Value(value)) => println!("{}", human_value(value)),
        (OutputFormat::Human, Item::Node(_)) => {
            println!("{}", serde_json::to_string_pretty(&item_to_json(&item)?)?)
        }
        (OutputFormat::Json, _) => println!("{}", serde_json::to_string(&item_to_json(&item)?)?),
    }
    Ok(())
}
