//! pdf2img - Entry point
//!
//! Usage: `pdf2img <input.pdf> [output-dir]`

use anyhow::{bail, Context};
use pdf2img::{convert_pdf_to_image, png_file_name, BinaryFile};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf2img=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: pdf2img <input.pdf> [output-dir]");
    };
    let output_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => input
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    tracing::info!(input = %input.display(), "Converting first page");

    let document = BinaryFile::from_path(&input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let result = convert_pdf_to_image(&document).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(error) = &result.error {
        bail!("{}", error);
    }

    if let Some(file) = &result.file {
        let output = output_dir.join(output_file_name(document.name()));
        tokio::fs::write(&output, file.bytes())
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;
        tracing::info!(output = %output.display(), bytes = file.size(), "Wrote PNG");
    }

    Ok(())
}

/// Name of the PNG written to disk.
///
/// Always ends in `.png`, so it can never name the input file: inputs without
/// a `.pdf` suffix get `.png` appended instead of keeping their name.
fn output_file_name(input_name: &str) -> String {
    let name = png_file_name(input_name);
    if name == input_name {
        format!("{}.png", input_name)
    } else {
        name
    }
}
