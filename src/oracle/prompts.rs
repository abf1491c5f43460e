//! Prompt templates for each oracle capability. All of them demand a
//! bare JSON object so replies survive the balanced-object extraction.

use crate::oracle::types::CourseCategory;

pub fn assessment_prompt(evidence: &str) -> String {
    format!(
        r#"You are an AI agent analyzing website content to recommend either a "Programming Course" or "Sales Course" to a course-selling company.

Based on the following website content, determine if the website owner would benefit more from a Programming Course or a Sales Course.

Website Content:
{evidence}

Analyze the content and return a JSON response with the following structure:
- ready: boolean (true if you have enough information to make a recommendation, false if you need more data)
- recommended_course: string ("Programming Course" or "Sales Course" or null if ready=false)
- recommendation_reasoning: string (ONE LINE explanation of your recommendation or "Need more data" if ready=false)
- recommendation_score: number (confidence score 0-100, or null if ready=false)

Consider these factors:
- Technical content, programming languages, software development, engineering → Programming Course
- Business content, marketing, sales, customer acquisition → Sales Course
- E-commerce, retail, service business → Sales Course

Return only valid JSON, no additional text."#
    )
}

pub fn forced_prompt(evidence: &str) -> String {
    format!(
        r#"You are an AI agent that MUST make a recommendation between "Programming Course" or "Sales Course" based on the limited website content provided.

Website Content:
{evidence}

Even with limited data, analyze what you can and make a recommendation. Consider:
- Any technical terms, programming languages, engineering content → Programming Course
- Any business, marketing, sales, e-commerce content → Sales Course
- Educational institutions → Programming Course (likely for students)
- Company websites → Sales Course (likely for business growth)
- If unclear, default to Programming Course

Return a JSON response with:
- ready: true
- recommended_course: "Programming Course" or "Sales Course"
- recommendation_reasoning: ONE LINE explanation based on available data
- recommendation_score: low score (20-50) due to limited data

Return only valid JSON, no additional text."#
    )
}

pub fn link_filter_prompt(urls: &[String], domain: &str, max_links: usize) -> String {
    let url_list = serde_json::to_string(urls).unwrap_or_default();
    format!(
        r#"You are analyzing website URLs to determine which ones are most likely to contain information relevant for recommending either a "Programming Course" or "Sales Course".

Base domain: {domain}
URLs to analyze: {url_list}

URLs that are LIKELY to be relevant:
- about, company, services, products pages
- departments, academics, courses, programs, research pages
- computer-science, engineering, technology, science pages
- business, marketing, sales, commerce pages
- faculty, staff, team, leadership pages

URLs that are UNLIKELY to be relevant:
- sports, athletics, events, gallery pages
- login, register, privacy, terms, sitemap, search pages
- location, directions, map pages

Return a JSON object with a single key 'selected_urls' holding a list of the most relevant URLs from the list above (up to {max_links}).
Example: {{"selected_urls": ["url_1", "url_2"]}}

Return only valid JSON, no additional text."#
    )
}

pub fn contact_link_prompt(
    urls: &[String],
    domain: &str,
    course: CourseCategory,
    max_links: usize,
) -> String {
    let url_list = serde_json::to_string(urls).unwrap_or_default();
    let (persona, priorities) = match course {
        CourseCategory::Programming => (
            "You are an expert data analyst specializing in website structure and contact information discovery for technology companies and technical institutions.",
            r#"PRIORITY URLs (select these if available):
- URLs containing: "faculty", "staff", "team", "leadership"
- URLs containing: "computer-science", "technology", "software", "informatics", "data-science"
- URLs containing: "professional-development", "contact", "administration"
- Faculty directory and staff listing pages

AVOID these types of URLs:
- Student-focused pages (admissions, applications, student life)
- Non-programming engineering departments (civil, mechanical, electrical)
- Non-technical departments (humanities, arts, sports)
- General policy, directions, and news pages"#,
        ),
        CourseCategory::Sales => (
            "You are an expert data analyst specializing in website structure and contact information discovery for business organizations.",
            r#"PRIORITY URLs (select these if available):
- URLs containing: "leadership", "management", "director", "dean"
- URLs containing: "business", "sales", "marketing", "hr", "training", "development"
- URLs containing: "executive", "administration", "partnership", "relations"
- URLs containing: "contact", "about", "team", "staff"

AVOID these types of URLs:
- Student-focused pages (admissions, applications, student life)
- Technical/engineering pages (unless they mention business development)
- Location, directions, and news pages"#,
        ),
    };

    format!(
        r#"Persona:
{persona} Your task is to identify the most informative URLs from a given list that will help a sales team find contact information and key personnel for {course} sales.

Base domain: {domain}

{priorities}

List of URLs to Analyze:
{url_list}

Required Output Format:
Your response MUST be a valid JSON object and nothing else. The JSON object should contain a single key, 'selected_urls', with a list of the most relevant URLs you have chosen (up to {max_links}, or all available if fewer).
Example: {{"selected_urls": ["url_1", "url_2", "url_3"]}}"#
    )
}

pub fn contact_extraction_prompt(page_text: &str, course: CourseCategory) -> String {
    let target_roles = match course {
        CourseCategory::Programming => {
            r#"- Head of Department for Computer Science, IT, or other software-related branches
- Training and Placement Officer or Head of Career Services
- CTO, VP of Engineering, technical directors, engineering heads
- Head of Learning & Development or HR managers involved in technical upskilling
- Faculty coordinators for technical student clubs"#
        }
        CourseCategory::Sales => {
            r#"- VP of Sales, Head of Sales, or Chief Revenue Officer
- Sales Training Manager or Head of Sales Enablement
- Dean of the Business School or heads of Marketing/Sales departments
- Head of Learning & Development or HR managers responsible for sales training
- Business development and partnership managers"#
        }
    };

    format!(
        r#"You are a lead generation specialist extracting contacts of potential buyers or key influencers for a {course}.

Prioritize individuals in these roles:
{target_roles}

Extract ALL contact information from the following page text. Include any person mentioned with their name, title, email address, or phone number.

Page Text:
{page_text}

Return ONLY a valid JSON object with this structure:
{{
    "contacts": [
        {{
            "name": "Full Name",
            "title": "Job Title/Position",
            "email": "Email Address",
            "phone": "Phone Number"
        }}
    ]
}}

Only include contacts that have at least an email address or phone number. Use null for fields that are not present.
If no contacts are found, return: {{"contacts": []}}"#
    )
}
