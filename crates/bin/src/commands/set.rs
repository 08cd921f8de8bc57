//! Apply `path=value` assignments to a configuration file.

use crate::cli::SetArgs;
use crate::commands::load;
use crate::output::OutputFormat;

/// Run the set command
///
/// Assignments are applied in order inside a backup, so a failing one leaves
/// the file untouched.
pub fn run(args: &SetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(&args.file)?;

    config.backup();
    for expression in &args.assignments {
        if let Err(e) = config.assign_path_expression(expression, !args.no_deduce, None) {
            tracing::warn!("Rejected assignment {expression:?}: {e}");
            config.restore()?;
            return Err(e.into());
        }
        tracing::info!("Applied {expression}");
    }
    config.discard_backup()?;

    let dict = serde_json::Value::Object(config.serialize_to_dict()?);
    let rendered = serde_json::to_string_pretty(&dict)?;

    if args.dry_run {
        println!("{rendered}");
        return Ok(());
    }

    if config.is_dirty() {
        std::fs::write(&args.file, format!("{rendered}\n"))?;
    }
    match format {
        OutputFormat::Human => println!(
            "{} assignment(s) applied to {}",
            args.assignments.len(),
            args.file.display()
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "file": args.file.display().to_string(),
                "applied": args.assignments.len(),
                "changed": config.is_dirty(),
            })
        ),
    }
    Ok(())
}
