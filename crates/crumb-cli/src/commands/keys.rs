//! Key management commands.
//!
//! `crumb keys generate` - Generate a new signing secret.

use anyhow::Context;
use crumb_token::SigningSecret;
use std::fs;
use std::path::PathBuf;

/// Generate a new signing secret.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let secret = SigningSecret::generate();
    let text = secret
        .expose_str()
        .context("Generated secret is not valid UTF-8")?;

    if let Some(output_path) = output {
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, text)?;

        println!("✔ Generated signing secret: {}", output_path.display());
        println!();
        println!("⚠️  Keep this file secure! Never commit it to version control.");
        println!();
        println!("Use it with:");
        println!("  crumb token mint --secret {} --sub <principal>", output_path.display());
        println!("  export CRUMB_SECRET=$(cat {})", output_path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}
