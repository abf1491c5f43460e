use dialoguer::{theme::ColorfulTheme, Select};
use tracing::error;

use crate::{cli::cli::MenuAction, models::CliApp, models::Result};

impl CliApp {
    pub async fn run(&self) -> Result<()> {
        println!("\n🤖 Course Lead Agent");
        println!("═══════════════════════════════════════");

        loop {
            let actions = vec![
                MenuAction::RunBatch,
                MenuAction::AnalyzeSingleSite,
                MenuAction::FilterOutputs,
                MenuAction::Exit,
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("\nSelect an action")
                .default(0)
                .items(&actions)
                .interact()?;

            match &actions[selection] {
                MenuAction::RunBatch => {
                    if let Err(e) = self.run_batch().await {
                        error!("Batch processing failed: {}", e);
                    }
                }
                MenuAction::AnalyzeSingleSite => {
                    if let Err(e) = self.run_single_site().await {
                        error!("Single site analysis failed: {}", e);
                    }
                }
                MenuAction::FilterOutputs => {
                    if let Err(e) = self.run_filter_outputs().await {
                        error!("Output filtering failed: {}", e);
                    }
                }
                MenuAction::Exit => {
                    println!("👋 Goodbye!");
                    break;
                }
            }
        }

        Ok(())
    }
}
