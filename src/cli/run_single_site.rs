use dialoguer::{theme::ColorfulTheme, Input};

use crate::models::{CliApp, Result};
use crate::targets::TargetSite;

impl CliApp {
    pub async fn run_single_site(&self) -> Result<()> {
        println!("\n🔎 Single Site Analysis");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let url: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Website URL")
            .interact_text()?;
        if url.trim().is_empty() {
            println!("❌ No URL given");
            return Ok(());
        }

        let target = TargetSite {
            name: url.clone(),
            url,
            location: None,
            phone: None,
            institution_type: None,
        };

        let result = self.process_target(&target).await?;

        println!("\n{}", "═".repeat(60));
        println!("ANALYSIS RESULTS");
        println!("{}", "═".repeat(60));
        println!("URL: {}", result.metadata.website_url);
        println!(
            "Recommendation: {}",
            result.course_recommendation.course
        );
        println!("Score: {}", result.course_recommendation.confidence);
        println!("Reasoning: {}", result.course_recommendation.reasoning);
        println!("Contacts found: {}", result.contact_info.contacts.len());
        for (i, contact) in result.contact_info.contacts.iter().enumerate() {
            println!("\n  {}. {}", i + 1, contact.name);
            if let Some(title) = &contact.title {
                println!("     Title: {}", title);
            }
            if let Some(email) = &contact.email {
                println!("     Email: {}", email);
            }
            if let Some(phone) = &contact.phone {
                println!("     Phone: {}", phone);
            }
        }
        println!("{}", "═".repeat(60));

        Ok(())
    }
}
