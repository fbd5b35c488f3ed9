//! Matrix command implementation

use std::path::Path;

use colored::Colorize;
use seedconf_core::{Initializer, Matrix, ProjectLayout};
use seedconf_fs::NormalizedPath;

use crate::error::{CliError, Result};
use crate::retry::RetryPolicy;

/// Run the matrix command
///
/// Every listed resolution runs even if an earlier one fails; the command
/// fails afterwards if any did.
pub fn run_matrix(start: &Path, file: Option<&Path>, policy: &RetryPolicy) -> Result<()> {
    let layout = ProjectLayout::discover(start)?;
    let matrix_path = match file {
        Some(path) => NormalizedPath::new(path),
        None => layout.matrix_file(),
    };
    let requests = Matrix::load(&matrix_path)?.requests()?;

    if requests.is_empty() {
        println!("No resolutions listed in {}", matrix_path);
        return Ok(());
    }

    println!("{} {}", "Resolution matrix".bold(), matrix_path.as_str().dimmed());
    let initializer = Initializer::new(layout);
    let mut failures = 0;

    for request in &requests {
        let label = format!("{}/{}", request.team_key, request.environment);
        match policy.run(|| initializer.initialize(request)) {
            Ok(store) => println!("  {} {} ({} keys)", "ok".green(), label.cyan(), store.len()),
            Err(e) => {
                failures += 1;
                tracing::debug!(request = %label, error = ?e, "Resolution failed");
                println!("  {} {}: {}", "FAILED".red().bold(), label.cyan(), e);
            }
        }
    }

    if failures > 0 {
        return Err(CliError::user(format!(
            "{failures} of {} resolutions failed",
            requests.len()
        )));
    }

    println!();
    println!("{} {} resolutions succeeded", "All".green().bold(), requests.len());
    Ok(())
}
