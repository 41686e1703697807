//! Instruction templates for the two output types.
//!
//! The generator sends exactly one of these per request. The user's idea is
//! quoted into the template and a reference URL, when present, follows as a
//! labeled `Source URL:` line so the URL-context tool can pick it up.

use crate::model::{GenerationRequest, OutputType};

/// System instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful, creative AI assistant that turns ideas into polished content.";

const ARTICLE_TEMPLATE: &str = r#"You are an expert editor and writer.
Task: Create a comprehensive, well-structured article based on the following input.
Input: "{input}"

Requirements:
- Use a professional, engaging tone.
- Use Markdown formatting (headers, lists, bolding).
- Structure:
    - Start with a clear H1 Title. Use exactly one H1.
    - Use H2 for main sections and H3 for subsections.
    - Leave generous whitespace between paragraphs and sections.
    - Use blockquotes for key insights or summaries.
- Enrich the content with relevant facts, context, and details found via Google Search.
- If a URL is provided, use it as a primary source but expand on it.
- Do not include "Here is the article" or similar meta-text. Start directly with the title (H1)."#;

const WEBPAGE_TEMPLATE: &str = r##"You are an expert web designer and developer.
Task: Create a single-file HTML static webpage that reads like a modern, high-quality encyclopedia entry or editorial piece based on the following input.
Input: "{input}"

Requirements:
- Output ONLY valid HTML code for one self-contained document.
- Design & Theme (adapt to the topic):
    - Technology/Sci-Fi: sleek, modern aesthetic (dark mode, monospaced accents, neon or cool blues).
    - Nature/Environment: organic colors (greens, browns, soft creams) and elegant serif typography.
    - History/Politics/Academic: classic editorial look (white or off-white background, strong serif headers, black text).
    - Art/Creative: bold, gallery-style layout with ample whitespace.
    - Match palette, typography, and layout to the character of the content.
- Content:
    - Deep, researched, and substantial, like a feature article.
    - Enrich with facts and details from Google Search.
- Constraints:
    - NO generic business branding (no fake "Company Name" logos).
    - NO generic navigation bars (Home, About, Contact).
    - NO social media footers or "Subscribe" boxes.
    - Focus entirely on the reading experience.
- Navigation (MANDATORY):
    - Include a "Table of Contents" or "On this page" sidebar or floating menu.
    - Every entry MUST link to a section id within the document (e.g. <a href="#history">History</a> -> <h2 id="history">History</h2>).
- Citations & Links:
    - Hyperlink key terms and facts to their source URLs when provided in the prompt or found via search.
    - When no exact URL exists for a fact, add a [Source] link that anchors to a references section.
- Interactivity:
    - Subtle interactions only (scroll progress bar, sticky table of contents, image zoom).
- Structure:
    - Semantic HTML5, responsive (mobile-first), Google Fonts allowed.
- Do not wrap the HTML in markdown code fences. Return the raw HTML only."##;

/// Augmentation capabilities the service may use while generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Augmentation {
    Search,
    UrlContext,
}

/// Template for an output type
pub fn template(output_type: OutputType) -> &'static str {
    match output_type {
        OutputType::Article => ARTICLE_TEMPLATE,
        OutputType::Webpage => WEBPAGE_TEMPLATE,
    }
}

/// Full prompt text for a request
pub fn build_prompt(request: &GenerationRequest) -> String {
    let prompt = template(request.output_type).replace("{input}", request.idea.trim());
    match request.reference_url() {
        Some(url) => format!("{prompt}\n\nSource URL: {url}"),
        None => prompt,
    }
}

/// Search is always on; URL context only when a reference URL is given
pub fn augmentations(request: &GenerationRequest) -> Vec<Augmentation> {
    let mut tools = vec![Augmentation::Search];
    if request.reference_url().is_some() {
        tools.push(Augmentation::UrlContext);
    }
    tools
}
