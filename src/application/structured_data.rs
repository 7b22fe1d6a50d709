//! schema.org JSON-LD for job detail and marketing pages.

use serde_json::{Map, Value, json};
use time::format_description::well_known::Rfc3339;

use crate::{
    config::{MarketingPage, PageKind, SiteConfig},
    domain::{entities::JobRecord, types::WorkplaceType},
};

use super::markdown::plain_text;

/// `JobPosting` document, serialized and safe to embed in a `<script>` element.
pub fn job_posting_ld_json(job: &JobRecord, site: &SiteConfig) -> Option<String> {
    let mut posting = Map::new();
    posting.insert("@context".into(), json!("https://schema.org"));
    posting.insert("@type".into(), json!("JobPosting"));
    posting.insert("title".into(), json!(job.title));
    posting.insert("description".into(), json!(plain_text(&job.description)));
    posting.insert(
        "hiringOrganization".into(),
        json!({ "@type": "Organization", "name": job.company }),
    );
    posting.insert(
        "url".into(),
        json!(site.absolute_url(&format!("jobs/{}", job.id))),
    );

    if let Some(posted) = job.posted_date.and_then(|date| date.format(&Rfc3339).ok()) {
        posting.insert("datePosted".into(), json!(posted));
    }
    if let Some(valid) = job.valid_through.and_then(|date| date.format(&Rfc3339).ok()) {
        posting.insert("validThrough".into(), json!(valid));
    }
    if let Some(kind) = job.job_type {
        posting.insert("employmentType".into(), json!(kind.schema_employment_type()));
    }
    if let Some(identifier) = job.job_identifier.as_deref() {
        posting.insert(
            "identifier".into(),
            json!({
                "@type": "PropertyValue",
                "name": job.job_source_name.as_deref().unwrap_or(&job.company),
                "value": identifier,
            }),
        );
    }

    match job.workplace_type {
        WorkplaceType::Remote => {
            posting.insert("jobLocationType".into(), json!("TELECOMMUTE"));
            if let Some(region) = job.remote_region {
                posting.insert(
                    "applicantLocationRequirements".into(),
                    json!({ "@type": "Country", "name": region.as_str() }),
                );
            }
        }
        _ => {
            if job.workplace_city.is_some() || job.workplace_country.is_some() {
                posting.insert(
                    "jobLocation".into(),
                    json!({
                        "@type": "Place",
                        "address": {
                            "@type": "PostalAddress",
                            "addressLocality": job.workplace_city,
                            "addressCountry": job.workplace_country,
                        },
                    }),
                );
            }
        }
    }

    if let Some(salary) = job.salary.as_ref() {
        let mut value = Map::new();
        value.insert("@type".into(), json!("QuantitativeValue"));
        value.insert("unitText".into(), json!(salary.unit.schema_unit_text()));
        if let Some(min) = salary.min {
            value.insert("minValue".into(), json!(min));
        }
        if let Some(max) = salary.max {
            value.insert("maxValue".into(), json!(max));
        }
        posting.insert(
            "baseSalary".into(),
            json!({
                "@type": "MonetaryAmount",
                "currency": salary.currency,
                "value": Value::Object(value),
            }),
        );
    }

    let optional_text = [
        ("skills", job.details.skills.as_deref()),
        ("qualifications", job.details.qualifications.as_deref()),
        ("educationRequirements", job.details.education_requirements.as_deref()),
        ("experienceRequirements", job.details.experience_requirements.as_deref()),
        ("industry", job.details.industry.as_deref()),
        ("occupationalCategory", job.details.occupational_category.as_deref()),
        ("responsibilities", job.details.responsibilities.as_deref()),
        ("jobBenefits", job.benefits.as_deref()),
    ];
    for (key, value) in optional_text {
        if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
            posting.insert(key.into(), json!(plain_text(value)));
        }
    }
    if !job.languages.is_empty() {
        posting.insert("inLanguage".into(), json!(job.languages));
    }
    if job.visa_sponsorship == crate::domain::types::VisaSponsorship::Yes {
        posting.insert("eligibilityToWorkRequirement".into(), json!("Visa sponsorship available"));
    }

    script_safe(&Value::Object(posting))
}

/// `BreadcrumbList` for a job: home, the listing, then the job itself.
pub fn job_breadcrumb_ld_json(job: &JobRecord, site: &SiteConfig) -> Option<String> {
    script_safe(&breadcrumb_list(
        site,
        &[
            ("Jobs", site.absolute_url("jobs")),
            (job.title.as_str(), site.absolute_url(&format!("jobs/{}", job.id))),
        ],
    ))
}

/// Documents for a marketing page: its breadcrumb trail, then the page type named by `kind`.
pub fn marketing_page_ld_json(page: &MarketingPage, site: &SiteConfig) -> Vec<String> {
    let url = site.absolute_url(&page.slug);
    let mut documents = vec![breadcrumb_list(site, &[(page.title.as_str(), url.clone())])];
    if let Some(kind) = page.kind {
        documents.push(page_document(kind, page, site, &url));
    }
    documents.iter().filter_map(script_safe).collect()
}

fn page_document(kind: PageKind, page: &MarketingPage, site: &SiteConfig, url: &str) -> Value {
    let description = if page.description.trim().is_empty() {
        site.description.as_str()
    } else {
        page.description.as_str()
    };

    match kind {
        PageKind::About => json!({
            "@context": "https://schema.org",
            "@type": "AboutPage",
            "name": format!("About {}", site.title),
            "description": description,
            "url": url,
            "mainEntity": organization(site, description, None),
        }),
        PageKind::Contact => json!({
            "@context": "https://schema.org",
            "@type": "ContactPage",
            "name": format!("Contact {}", site.title),
            "description": description,
            "url": url,
            "mainEntity": organization(site, description, page.email.as_deref()),
        }),
        PageKind::Faq => {
            let questions: Vec<Value> = faq_entries(&page.markdown)
                .into_iter()
                .map(|(question, answer)| {
                    json!({
                        "@type": "Question",
                        "name": question,
                        "acceptedAnswer": { "@type": "Answer", "text": answer },
                    })
                })
                .collect();
            json!({
                "@context": "https://schema.org",
                "@type": "FAQPage",
                "url": url,
                "mainEntity": questions,
            })
        }
    }
}

fn organization(site: &SiteConfig, description: &str, email: Option<&str>) -> Value {
    let mut org = Map::new();
    org.insert("@type".into(), json!("Organization"));
    org.insert("name".into(), json!(site.title));
    org.insert("description".into(), json!(description));
    org.insert("url".into(), json!(site.absolute_url("")));
    if let Some(logo) = site.logo.as_deref().filter(|logo| !logo.is_empty()) {
        let logo = if logo.starts_with("http://") || logo.starts_with("https://") {
            logo.to_string()
        } else {
            site.absolute_url(logo)
        };
        org.insert("logo".into(), json!(logo));
    }
    if let Some(email) = email.filter(|email| !email.is_empty()) {
        org.insert("email".into(), json!(email));
    }
    Value::Object(org)
}

/// Home first, then `trail` in order, positions counted from 1.
fn breadcrumb_list(site: &SiteConfig, trail: &[(&str, String)]) -> Value {
    let home = ("Home", site.absolute_url(""));
    let items: Vec<Value> = std::iter::once((home.0, home.1.as_str()))
        .chain(trail.iter().map(|(name, url)| (*name, url.as_str())))
        .enumerate()
        .map(|(index, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": name,
                "item": url,
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// Question and answer pairs from `## ` headings and the text beneath each of them.
fn faq_entries(markdown: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in markdown.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            entries.extend(current.take());
            let question = heading.trim().trim_end_matches('#').trim();
            if !question.is_empty() {
                current = Some((question.to_string(), String::new()));
            }
        } else if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    entries.extend(current);

    entries
        .into_iter()
        .map(|(question, body)| (plain_text(&question), plain_text(&body)))
        .filter(|(_, answer)| !answer.is_empty())
        .collect()
}

fn script_safe(document: &Value) -> Option<String> {
    serde_json::to_string(document)
        .ok()
        .map(|encoded| encoded.replace("</", "<\\/"))
}
