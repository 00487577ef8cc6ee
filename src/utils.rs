//! Utility functions for user interaction.
use crate::error::Result;
use crate::storage::constants::PREVIEW_LIMIT;
use std::io::{self, Write};

/// Prompt user for confirmation before deleting remote files.
pub fn confirm_deletion(names: &[String], force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    println!("About to delete {} file(s):", names.len());
    for name in names.iter().take(PREVIEW_LIMIT) {
        println!("  {name}");
    }
    if names.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", names.len() - PREVIEW_LIMIT);
    }

    print!("Are you sure you want to delete the selected files? (y/N): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}

pub fn is_affirmative(input: &str) -> bool {
    let answer = input.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
