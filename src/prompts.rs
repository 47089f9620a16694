//! Prompt templates.
//!
//! Pure string templating; no upstream call and no rate limiting. Arguments
//! arrive as strings per MCP, but booleans and integers sent as JSON values
//! are accepted too. List arguments may be a JSON array or a comma-separated
//! string.

use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::convert::{get_optional_string, get_string_arg, string_list};
use crate::error::{McpError, Result};

/// One prompt argument for `prompts/list`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    /// Argument name
    pub name: &'static str,
    /// What to pass
    pub description: &'static str,
    /// Whether the argument must be supplied
    pub required: bool,
}

/// A prompt definition for `prompts/list`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDef {
    /// Prompt name
    pub name: &'static str,
    /// Prompt description
    pub description: &'static str,
    /// Accepted arguments
    pub arguments: Vec<PromptArgument>,
}

const fn arg(name: &'static str, description: &'static str, required: bool) -> PromptArgument {
    PromptArgument {
        name,
        description,
        required,
    }
}

/// Writing guidance for composing a new post.
struct PostStyle {
    char_limit: u32,
    best_practices: [&'static str; 4],
    style: &'static str,
}

fn post_style(platform: &str) -> PostStyle {
    match platform.to_lowercase().as_str() {
        "twitter" | "x" => PostStyle {
            char_limit: 280,
            best_practices: [
                "Be concise and punchy",
                "Use 1-2 relevant hashtags",
                "Include mentions when appropriate",
                "Front-load important information",
            ],
            style: "conversational and concise",
        },
        "linkedin" => PostStyle {
            char_limit: 3000,
            best_practices: [
                "Lead with value and insights",
                "Use 3-5 professional hashtags",
                "Include data or statistics when relevant",
                "End with thought-provoking questions",
            ],
            style: "professional thought leadership",
        },
        "instagram" => PostStyle {
            char_limit: 2200,
            best_practices: [
                "Focus on visual storytelling",
                "Use 10-30 relevant hashtags",
                "Include emojis strategically",
                "Break text into readable chunks with line breaks",
            ],
            style: "visual-first with engaging caption",
        },
        "tiktok" => PostStyle {
            char_limit: 2200,
            best_practices: [
                "Be authentic and relatable",
                "Use 3-5 trending hashtags",
                "Keep it short and attention-grabbing",
                "Embrace trends and challenges",
            ],
            style: "fun, trendy, and authentic",
        },
        _ => PostStyle {
            char_limit: 63206,
            best_practices: [
                "Tell a story",
                "Ask questions to encourage engagement",
                "Use minimal hashtags (0-2)",
                "Include emojis sparingly",
            ],
            style: "friendly and engaging storytelling",
        },
    }
}

/// Requirements for rewriting an existing post.
struct RewriteStyle {
    char_limit: u32,
    tone: &'static str,
    hashtags: &'static str,
    style: &'static str,
}

fn rewrite_style(platform: &str) -> RewriteStyle {
    let (char_limit, tone, hashtags, style) = match platform.to_lowercase().as_str() {
        "twitter" | "x" => (
            280,
            "conversational and concise",
            "1-2 relevant hashtags",
            "punchy and engaging",
        ),
        "facebook" => (
            63206,
            "friendly and personal",
            "minimal, focus on storytelling",
            "detailed and engaging",
        ),
        "linkedin" => (
            3000,
            "professional and insightful",
            "3-5 professional hashtags",
            "thought leadership and value-driven",
        ),
        "instagram" => (
            2200,
            "visual-first with engaging caption",
            "10-30 relevant hashtags",
            "storytelling with emoji support",
        ),
        "tiktok" => (
            2200,
            "fun, trendy, authentic",
            "3-5 trending hashtags",
            "attention-grabbing and relatable",
        ),
        _ => (
            2000,
            "engaging and platform-appropriate",
            "2-5 relevant hashtags",
            "clear and compelling",
        ),
    };
    RewriteStyle {
        char_limit,
        tone,
        hashtags,
        style,
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Prompt argument, stringified when it was sent as a JSON scalar.
fn text_arg(args: &Map<String, JsonValue>, name: &str, default: &str) -> Result<String> {
    match args.get(name) {
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        Some(JsonValue::Bool(b)) => Ok(b.to_string()),
        _ => Ok(get_optional_string(args, name)?.unwrap_or_else(|| default.to_string())),
    }
}

fn flag_arg(args: &Map<String, JsonValue>, name: &str, default: bool) -> Result<bool> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(default),
        Some(JsonValue::Bool(b)) => Ok(*b),
        Some(JsonValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(McpError::invalid(name, "expected true or false")),
        },
        Some(_) => Err(McpError::invalid(name, "expected true or false")),
    }
}

fn count_arg(args: &Map<String, JsonValue>, name: &str, default: u64) -> Result<u64> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(default),
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .filter(|n| *n > 0)
            .ok_or_else(|| McpError::invalid(name, "expected a positive integer")),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(default),
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| McpError::invalid(name, "expected a positive integer")),
        Some(_) => Err(McpError::invalid(name, "expected a positive integer")),
    }
}

fn list_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    let value = args
        .get(name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| McpError::MissingArg(name.to_string()))?;
    let items = string_list(name, value)?;
    if items.is_empty() {
        return Err(McpError::MissingArg(name.to_string()));
    }
    Ok(items.join(", "))
}

/// Registry of prompt templates.
pub struct PromptRegistry {
    prompts: Vec<PromptDef>,
}

impl PromptRegistry {
    /// Create the registry.
    pub fn new() -> Self {
        let prompts = vec![
            PromptDef {
                name: "create_social_post",
                description: "Write a new post tuned to one platform's limits and conventions.",
                arguments: vec![
                    arg("topic", "What the post is about", true),
                    arg("platform", "Target platform (facebook, twitter, linkedin, instagram, tiktok)", true),
                    arg("tone", "Desired tone (default: professional)", false),
                    arg("target_audience", "Who the post is for (default: general)", false),
                    arg("call_to_action", "Call to action to include", false),
                    arg("include_hashtags", "Whether to include hashtags (default: true)", false),
                ],
            },
            PromptDef {
                name: "analyze_performance",
                description: "Interpret analytics data and recommend improvements.",
                arguments: vec![
                    arg("post_analytics", "Analytics data as JSON or text", true),
                    arg("time_period", "Period the data covers (default: last 30 days)", false),
                    arg("platform", "Platform the data is for (default: all platforms)", false),
                ],
            },
            PromptDef {
                name: "optimize_for_platform",
                description: "Rewrite existing content for one platform.",
                arguments: vec![
                    arg("post_content", "Content to rewrite", true),
                    arg("target_platform", "Platform to rewrite for", true),
                ],
            },
            PromptDef {
                name: "generate_hashtags",
                description: "Suggest hashtags for a post across platforms.",
                arguments: vec![
                    arg("post_content", "The post", true),
                    arg("target_platforms", "Platforms, comma-separated", true),
                    arg("max_hashtags", "How many hashtags (default: 5)", false),
                ],
            },
            PromptDef {
                name: "schedule_campaign",
                description: "Plan a multi-platform posting schedule for a campaign.",
                arguments: vec![
                    arg("campaign_name", "Campaign name", true),
                    arg("start_date", "Start date (YYYY-MM-DD)", true),
                    arg("end_date", "End date (YYYY-MM-DD)", true),
                    arg("post_frequency", "e.g. daily, twice daily, 3x per week", true),
                    arg("platforms", "Platforms, comma-separated", true),
                    arg("campaign_goals", "What the campaign should achieve", true),
                ],
            },
        ];
        Self { prompts }
    }

    /// All prompt definitions.
    pub fn prompts(&self) -> &[PromptDef] {
        &self.prompts
    }

    /// Render a prompt to its text.
    pub fn render(&self, name: &str, args: &Map<String, JsonValue>) -> Result<String> {
        match name {
            "create_social_post" => create_social_post(args),
            "analyze_performance" => analyze_performance(args),
            "optimize_for_platform" => optimize_for_platform(args),
            "generate_hashtags" => generate_hashtags(args),
            "schedule_campaign" => schedule_campaign(args),
            _ => Err(McpError::UnknownPrompt(name.to_string())),
        }
    }

    /// Render a prompt as a `prompts/get` result.
    pub fn get(&self, name: &str, args: &Map<String, JsonValue>) -> Result<JsonValue> {
        let text = self.render(name, args)?;
        let description = self
            .prompts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.description)
            .unwrap_or_default();
        Ok(json!({
            "description": description,
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": text }
            }]
        }))
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn create_social_post(args: &Map<String, JsonValue>) -> Result<String> {
    let topic = get_string_arg(args, "topic")?;
    let platform = get_string_arg(args, "platform")?;
    let tone = text_arg(args, "tone", "professional")?;
    let audience = text_arg(args, "target_audience", "general")?;
    let cta = text_arg(args, "call_to_action", "")?;
    let hashtags = flag_arg(args, "include_hashtags", true)?;
    let guide = post_style(&platform);

    let mut lines = vec![
        format!("Create an engaging social media post for {}:\n", title_case(&platform)),
        format!("**Topic**: {}", topic),
        format!("**Tone**: {}", tone),
        format!("**Target Audience**: {}", audience),
        format!("**Character Limit**: {}", guide.char_limit),
        format!("**Style**: {}\n", guide.style),
        "**Best Practices for this platform**:".to_string(),
    ];
    lines.extend(guide.best_practices.iter().map(|p| format!("- {}", p)));
    lines.push("\n**Requirements**:".to_string());
    lines.push("1. Stay within character limit".to_string());
    lines.push(format!("2. Match the {} tone", tone));
    lines.push(format!("3. Appeal to {}", audience));
    lines.push("4. Optimize for engagement and shareability".to_string());
    let mut next = 5;
    if !cta.is_empty() {
        lines.push(format!("{}. Include this call-to-action: {}", next, cta));
        next += 1;
    }
    if hashtags {
        lines.push(format!("{}. Include platform-appropriate hashtags", next));
    }
    lines.push("\n**Output Format**:".to_string());
    lines.push(
        "Return ONLY the final post text, ready to publish. \
         Do not include any explanations or meta-commentary."
            .to_string(),
    );
    Ok(lines.join("\n"))
}

fn analyze_performance(args: &Map<String, JsonValue>) -> Result<String> {
    let analytics = match args.get("post_analytics") {
        Some(v @ (JsonValue::Object(_) | JsonValue::Array(_))) => serde_json::to_string_pretty(v)?,
        _ => get_string_arg(args, "post_analytics")?,
    };
    let period = text_arg(args, "time_period", "last 30 days")?;
    let platform = text_arg(args, "platform", "all platforms")?;

    Ok(format!(
        r#"Analyze this social media performance data and provide actionable insights:

**Time Period**: {period}
**Platform**: {platform}

**Analytics Data**:
{analytics}

**Analysis Requirements**:

1. **Performance Overview**
   - Summarize key metrics (engagement rate, reach, impressions)
   - Identify best and worst performing content
   - Compare to industry benchmarks if possible

2. **Trends & Patterns**
   - What content types perform best?
   - What posting times show highest engagement?
   - Which platforms are most effective?
   - Are there any concerning trends?

3. **Audience Insights**
   - What does engagement tell us about the audience?
   - Which demographics are most responsive?
   - What topics resonate most?

4. **Actionable Recommendations**
   - Specific strategies to improve engagement
   - Content suggestions based on performance data
   - Posting schedule optimizations
   - Platform-specific tactical improvements

5. **Next Steps**
   - Top 3-5 priority actions to implement
   - Expected impact of each recommendation
   - Timeline for implementation

**Output Format**:
Provide a clear, structured analysis with specific numbers and percentages. Focus on actionable insights rather than generic advice. Be data-driven and strategic."#
    ))
}

fn optimize_for_platform(args: &Map<String, JsonValue>) -> Result<String> {
    let content = get_string_arg(args, "post_content")?;
    let platform = get_string_arg(args, "target_platform")?;
    let guide = rewrite_style(&platform);

    Ok(format!(
        r#"Optimize this social media post for {platform}:

Original Content:
{content}

Platform Requirements for {platform}:
- Character Limit: {limit}
- Tone: {tone}
- Hashtag Strategy: {hashtags}
- Style: {style}

Please create an optimized version that:
1. Fits within the character limit
2. Matches the platform's tone and culture
3. Includes appropriate hashtags
4. Maximizes engagement potential
5. Preserves the core message

Return ONLY the optimized post content, ready to publish."#,
        limit = guide.char_limit,
        tone = guide.tone,
        hashtags = guide.hashtags,
        style = guide.style,
    ))
}

fn generate_hashtags(args: &Map<String, JsonValue>) -> Result<String> {
    let content = get_string_arg(args, "post_content")?;
    let platforms = list_arg(args, "target_platforms")?;
    let max = count_arg(args, "max_hashtags", 5)?;

    Ok(format!(
        r#"Generate relevant hashtags for this social media post:

Post Content:
{content}

Target Platforms: {platforms}
Maximum Hashtags: {max}

Requirements:
1. Generate {max} highly relevant hashtags
2. Mix of popular and niche hashtags
3. Consider platform-specific trends
4. Include industry/topic-specific tags
5. Avoid overused or spammy hashtags

Return hashtags in this format:
#hashtag1 #hashtag2 #hashtag3 ...

Focus on hashtags that will maximize reach and engagement on {platforms}."#
    ))
}

fn schedule_campaign(args: &Map<String, JsonValue>) -> Result<String> {
    let name = get_string_arg(args, "campaign_name")?;
    let start = get_string_arg(args, "start_date")?;
    let end = get_string_arg(args, "end_date")?;
    let frequency = get_string_arg(args, "post_frequency")?;
    let platforms = list_arg(args, "platforms")?;
    let goals = get_string_arg(args, "campaign_goals")?;

    Ok(format!(
        r#"Create a detailed social media campaign schedule:

Campaign Details:
- Name: {name}
- Duration: {start} to {end}
- Posting Frequency: {frequency}
- Platforms: {platforms}
- Goals: {goals}

Please create a comprehensive schedule that includes:

1. **Posting Calendar**
   - Specific dates and times for each post
   - Platform-specific content for {platforms}
   - Content themes for each post

2. **Content Strategy**
   - Post types (promotional, educational, engaging, etc.)
   - Content mix ratios
   - Platform-specific adaptations

3. **Engagement Strategy**
   - Peak posting times for each platform
   - Community interaction plan
   - Response templates

4. **Performance Tracking**
   - Key metrics to monitor
   - Success criteria
   - Adjustment triggers

Format the schedule as a detailed calendar with:
- Date/Time
- Platform(s)
- Post Type
- Content Theme
- Call-to-Action

Focus on achieving: {goals}"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: JsonValue) -> Map<String, JsonValue> {
        v.as_object().cloned().unwrap()
    }

    fn render(name: &str, v: JsonValue) -> String {
        PromptRegistry::new().render(name, &args(v)).unwrap()
    }

    #[test]
    fn optimize_uses_platform_table() {
        let text = render(
            "optimize_for_platform",
            json!({"post_content": "Launch day", "target_platform": "Twitter"}),
        );
        assert!(text.contains("280"));
        assert!(text.contains("1-2 relevant hashtags"));
        assert!(text.contains("punchy and engaging"));
        assert!(text.contains("Return ONLY the optimized post content"));
    }

    #[test]
    fn optimize_unknown_platform_falls_back() {
        let text = render(
            "optimize_for_platform",
            json!({"post_content": "x", "target_platform": "unknown_platform"}),
        );
        assert!(text.contains("2000"));
        assert!(text.contains("engaging and platform-appropriate"));
        assert!(text.contains("2-5 relevant hashtags"));
    }

    #[test]
    fn create_post_falls_back_to_facebook() {
        let text = render(
            "create_social_post",
            json!({"topic": "Rust 2.0", "platform": "mastodon", "call_to_action": "Read more"}),
        );
        assert!(text.contains("for Mastodon"));
        assert!(text.contains("63206"));
        assert!(text.contains("5. Include this call-to-action: Read more"));
        assert!(text.contains("6. Include platform-appropriate hashtags"));
        assert!(text.contains("Match the professional tone"));
    }

    #[test]
    fn create_post_without_hashtags() {
        let text = render(
            "create_social_post",
            json!({"topic": "t", "platform": "linkedin", "include_hashtags": "false"}),
        );
        assert!(text.contains("3000"));
        assert!(!text.contains("platform-appropriate hashtags"));
    }

    #[test]
    fn hashtag_lists_accept_strings_and_arrays() {
        let from_string = render(
            "generate_hashtags",
            json!({"post_content": "tech innovation", "target_platforms": "twitter, linkedin,facebook", "max_hashtags": "3"}),
        );
        let from_array = render(
            "generate_hashtags",
            json!({"post_content": "tech innovation", "target_platforms": ["twitter", "linkedin", "facebook"], "max_hashtags": 3}),
        );
        assert_eq!(from_string, from_array);
        assert!(from_string.contains("twitter, linkedin, facebook"));
        assert!(from_string.contains("Generate 3 highly relevant hashtags"));

        let default = render(
            "generate_hashtags",
            json!({"post_content": "p", "target_platforms": "instagram"}),
        );
        assert!(default.contains("Generate 5 highly relevant hashtags"));
    }

    #[test]
    fn campaign_requires_every_argument() {
        let err = PromptRegistry::new()
            .render("schedule_campaign", &args(json!({"campaign_name": "Spring"})))
            .unwrap_err();
        assert!(matches!(err, McpError::MissingArg(_)));
        let text = render(
            "schedule_campaign",
            json!({
                "campaign_name": "Spring",
                "start_date": "2025-03-01",
                "end_date": "2025-03-31",
                "post_frequency": "daily",
                "platforms": "facebook,instagram",
                "campaign_goals": "awareness"
            }),
        );
        assert!(text.contains("Duration: 2025-03-01 to 2025-03-31"));
        assert!(text.contains("Platform-specific content for facebook, instagram"));
    }

    #[test]
    fn get_wraps_text_in_a_user_message() {
        let registry = PromptRegistry::new();
        let result = registry
            .get("analyze_performance", &args(json!({"post_analytics": {"likes": 10}})))
            .unwrap();
        assert_eq!(result["messages"][0]["role"], "user");
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("\"likes\": 10"));
        assert!(text.contains("**Time Period**: last 30 days"));
        assert!(matches!(
            registry.get("nope", &Map::new()),
            Err(McpError::UnknownPrompt(_))
        ));
    }
}
