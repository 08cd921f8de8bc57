//! Print a whole configuration file.

use crate::cli::ShowArgs;
use crate::commands::load;
use crate::output::OutputFormat;

/// Run the show command
pub fn run(args: &ShowArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(&args.file)?;
    let dict = serde_json::Value::Object(config.serialize_to_dict()?);
    match format {
        OutputFormat::Human => println!("{}", serde_json::to_string_pretty(&dict)?),
        OutputFormat::Json => println!("{}", serde_json::to_string(&dict)?),
    }
    Ok(())
}
