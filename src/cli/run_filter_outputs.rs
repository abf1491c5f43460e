use tracing::warn;

use crate::models::{CliApp, Result};

impl CliApp {
    /// Post-pass over the output directory: copy only the results with
    /// at least one contact into the cleaned directory.
    pub async fn run_filter_outputs(&self) -> Result<()> {
        println!("\n🧹 Filtering results with contacts");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let outputs = &self.config.output.directory;
        let cleaned = &self.config.output.cleaned_directory;
        tokio::fs::create_dir_all(cleaned).await?;

        let mut entries = match tokio::fs::read_dir(outputs).await {
            Ok(entries) => entries,
            Err(e) => {
                println!("❌ Cannot read '{}': {}", outputs, e);
                return Ok(());
            }
        };

        let mut processed = 0usize;
        let mut copied = 0usize;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            processed += 1;

            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Cannot read {}: {}", path.display(), e);
                    continue;
                }
            };
            // Error records and malformed files simply stay behind
            let value: serde_json::Value = match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Cannot parse {}: {}", path.display(), e);
                    continue;
                }
            };

            if has_contacts(&value) {
                let filename = entry.file_name();
                let destination = std::path::Path::new(cleaned).join(&filename);
                tokio::fs::write(&destination, &content).await?;
                copied += 1;
                println!("  ✓ {}", filename.to_string_lossy());
            }
        }

        println!("\nProcessed: {} files", processed);
        println!("Copied to '{}': {}", cleaned, copied);
        println!("Skipped: {}", processed - copied);

        Ok(())
    }
}

fn has_contacts(value: &serde_json::Value) -> bool {
    value
        .get("contact_info")
        .and_then(|info| info.get("contacts"))
        .and_then(|contacts| contacts.as_array())
        .map(|contacts| !contacts.is_empty())
        .unwrap_or(false)
}
