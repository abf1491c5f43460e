use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::agent::{ContactHarvester, SiteClassifier};
use crate::fetcher::{domain_of, normalize_url};
use crate::models::{CliApp, ContactInfo, Result, ResultMetadata, SiteResult};
use crate::targets::{load_targets, TargetSite};

impl CliApp {
    pub async fn run_batch(&self) -> Result<()> {
        println!("\n🚀 Batch Processing");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Target list file")
            .default("targets.yml".to_string())
            .interact_text()?;

        let mut targets = load_targets(&path).await?;
        println!("📊 Loaded {} targets from {}", targets.len(), path);

        let cap: usize = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("How many to process (0 = all)")
            .default(0)
            .interact_text()?;
        if cap > 0 && cap < targets.len() {
            targets.truncate(cap);
            println!("🎯 Processing first {} targets", targets.len());
        }

        if !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Process {} targets?", targets.len()))
            .default(true)
            .interact()?
        {
            println!("❌ Batch cancelled");
            return Ok(());
        }

        let start = Instant::now();
        let mut successful = 0usize;
        let mut failed = 0usize;

        for (i, target) in targets.iter().enumerate() {
            println!("\n{}", "═".repeat(60));
            println!(
                "Processing {}/{}: {} ({})",
                i + 1,
                targets.len(),
                target.name,
                target.url
            );
            println!("{}", "═".repeat(60));

            // One bad target must never take the batch down with it
            match self.process_target(target).await {
                Ok(result) => {
                    successful += 1;
                    println!(
                        "✅ {} → {} (score {}), {} contacts",
                        target.name,
                        result.course_recommendation.course,
                        result.course_recommendation.confidence,
                        result.contact_info.contacts.len()
                    );
                }
                Err(e) => {
                    failed += 1;
                    error!("Failed to process {}: {}", target.name, e);
                    if let Err(write_err) = self.write_error_record(target, &e.to_string()).await {
                        error!(
                            "Could not record error for {}: {}",
                            target.name, write_err
                        );
                    }
                }
            }
        }

        let elapsed = start.elapsed();
        println!("\n{}", "═".repeat(60));
        println!("🏁 BATCH COMPLETE");
        println!("{}", "═".repeat(60));
        println!("Targets processed: {}", targets.len());
        println!("Successful: {}", successful);
        println!("Failed: {}", failed);
        println!(
            "Elapsed: {:.1}s ({:.1}s per target)",
            elapsed.as_secs_f64(),
            elapsed.as_secs_f64() / targets.len().max(1) as f64
        );
        println!("Results saved in '{}'", self.config.output.directory);

        Ok(())
    }

    pub async fn process_target(&self, target: &TargetSite) -> Result<SiteResult> {
        let classifier = SiteClassifier::new(&self.fetcher, &self.oracle, &self.config.crawl);
        let recommendation = classifier.classify(&target.url).await;
        info!(
            "{} classified as {} (score {})",
            target.url, recommendation.course, recommendation.confidence
        );

        let harvester = ContactHarvester::new(&self.fetcher, &self.oracle, &self.config.crawl);
        let contacts = harvester.harvest(&target.url, recommendation.course).await;

        let result = SiteResult {
            course_recommendation: recommendation,
            contact_info: ContactInfo { contacts },
            metadata: ResultMetadata {
                institution_name: target.name.clone(),
                website_url: target.url.clone(),
                location: target.location.clone(),
                phone: target.phone.clone(),
                institution_type: target.institution_type.clone(),
                run_id: Uuid::new_v4().to_string(),
                processed_at: chrono::Utc::now().to_rfc3339(),
            },
        };

        self.write_result(&result).await?;
        Ok(result)
    }

    async fn write_result(&self, result: &SiteResult) -> Result<()> {
        tokio::fs::create_dir_all(&self.config.output.directory).await?;
        let filename = format!(
            "{}/{}.json",
            self.config.output.directory,
            domain_slug(&result.metadata.website_url)
        );
        let json = if self.config.output.pretty_json {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        tokio::fs::write(&filename, json).await?;
        info!("Saved result to {}", filename);
        Ok(())
    }

    async fn write_error_record(&self, target: &TargetSite, error: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.config.output.directory).await?;
        let filename = format!(
            "{}/{}_ERROR.json",
            self.config.output.directory,
            domain_slug(&target.url)
        );
        let record = serde_json::json!({
            "error": error,
            "metadata": {
                "institution_name": target.name,
                "website_url": target.url,
                "processed_at": chrono::Utc::now().to_rfc3339(),
                "status": "failed",
            }
        });
        tokio::fs::write(&filename, serde_json::to_string_pretty(&record)?).await?;
        Ok(())
    }
}

/// Filesystem-safe slug for a target, derived from its host name.
pub fn domain_slug(url: &str) -> String {
    let normalized = normalize_url(url);
    let host = domain_of(&normalized).unwrap_or(normalized);
    host.trim_start_matches("www.")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_www_and_scheme() {
        assert_eq!(domain_slug("https://www.example.edu/path"), "example.edu");
        assert_eq!(domain_slug("example.com"), "example.com");
    }
}
