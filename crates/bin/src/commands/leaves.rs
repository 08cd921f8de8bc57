//! List every leaf of a configuration file.

use crate::cli::LeavesArgs;
use crate::commands::load;
use crate::output::{OutputFormat, human_value, print_table};

/// Run the leaves command
pub fn run(args: &LeavesArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(&args.file)?;
    let leaves = config.traverse_leaves()?;

    match format {
        OutputFormat::Human => {
            if leaves.is_empty() {
                println!("No values found.");
                return Ok(());
            }
            let mut rows = Vec::with_capacity(leaves.len());
            for (path, leaf) in &leaves {
                rows.push(vec![path.clone(), human_value(&leaf.get_value()?)]);
            }
            print_table(&["PATH", "VALUE"], &rows);
        }
        OutputFormat::Json => {
            let mut entries = Vec::with_capacity(leaves.len());
            for (path, leaf) in &leaves {
                entries.push(serde_json::json!({
                    "path": path,
                    "value": leaf.get_value()?.to_json(),
                }));
            }
            println!("{}", serde_json::to_string(&entries)?);
        }
    }
    Ok(())
}
