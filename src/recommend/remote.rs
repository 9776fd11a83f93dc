//! Reasoning-service-backed recommendation source.
//!
//! Builds one prompt summarizing all three dimension reports, sends it to
//! the configured [`ReasoningService`], and parses the pipe-delimited reply
//! into [`Recommendation`]s. Lines that do not follow the
//! `CATEGORY|PRIORITY|ISSUE|SOLUTION` grammar are dropped; if nothing
//! survives, the synthesizer falls back to the local source.

use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use super::{RecommendationInput, RecommendationSource};
use crate::reasoning::ReasoningService;
use crate::report::{Dimension, DimensionReport, Priority, Recommendation};

const SYSTEM_PROMPT: &str = "You are SAGE, an expert SEO/AEO/GEO optimization consultant. \
Provide clear, actionable recommendations in a structured format.";

// Only the top issues per dimension make it into the prompt.
const PROMPT_ISSUE_CAP: usize = 5;

/// Recommendation source backed by an external reasoning service.
pub struct RemoteSource {
    service: Arc<dyn ReasoningService>,
}

impl RemoteSource {
    pub fn new(service: Arc<dyn ReasoningService>) -> Self {
        RemoteSource { service }
    }
}

#[async_trait]
impl RecommendationSource for RemoteSource {
    async fn generate(
        &self,
        input: &RecommendationInput<'_>,
    ) -> anyhow::Result<Vec<Recommendation>> {
        let prompt = build_prompt(input);
        let reply = self.service.complete(SYSTEM_PROMPT, &prompt).await?;
        let recommendations = parse_reply(&reply);
        log::debug!(
            "Parsed {} recommendations from reasoning service for {}",
            recommendations.len(),
            input.url
        );
        Ok(recommendations)
    }
}

fn build_prompt(input: &RecommendationInput<'_>) -> String {
    let mut prompt = format!(
        "Analyze this website audit for {} and provide 6-8 prioritized recommendations.\n\n",
        input.url
    );

    push_dimension(&mut prompt, Dimension::Seo, input.seo);
    push_dimension(&mut prompt, Dimension::Aeo, input.aeo);
    push_dimension(&mut prompt, Dimension::Geo, input.geo);

    prompt.push_str(
        "Provide recommendations in this EXACT format (one per line):\n\
         CATEGORY|PRIORITY|ISSUE|SOLUTION\n\n\
         Where:\n\
         - CATEGORY is one of: SEO, AEO, GEO\n\
         - PRIORITY is one of: High, Medium, Low\n\
         - ISSUE is a brief description of the problem\n\
         - SOLUTION is a specific, actionable fix\n\n\
         Example:\n\
         SEO|High|Missing meta description|Add a compelling 150-160 character meta \
         description that includes primary keywords and encourages clicks.\n\n\
         Provide 6-8 recommendations, prioritizing High impact issues first.",
    );

    prompt
}

fn push_dimension(prompt: &mut String, dimension: Dimension, report: &DimensionReport) {
    let _ = writeln!(prompt, "**{dimension} Score: {}/100**", report.score);
    let _ = writeln!(prompt, "{dimension} Issues:");
    for issue in report.issues.iter().take(PROMPT_ISSUE_CAP) {
        let _ = writeln!(prompt, "- {issue}");
    }
    prompt.push('\n');
}

fn parse_reply(reply: &str) -> Vec<Recommendation> {
    reply.lines().filter_map(parse_line).collect()
}

// One recommendation per well-formed line; everything else is ignored.
fn parse_line(line: &str) -> Option<Recommendation> {
    let line = line.trim();
    if !line.contains('|') {
        return None;
    }
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() != 4 {
        return None;
    }
    let category = Dimension::from_str(parts[0]).ok()?;
    let priority = Priority::from_str(parts[1]).ok()?;
    Some(Recommendation {
        category,
        priority,
        issue: parts[2].to_string(),
        solution: parts[3].to_string(),
    })
}
