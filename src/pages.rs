//! Server-rendered views: the input form and the result screen.

use crate::input::{InputDraft, can_submit};
use crate::model::{OutputType, SourceLink};
use crate::render::{article_html, escape_html, frame::FRAME_SANDBOX};
use crate::session::Displayed;

const APP_TITLE: &str = "Idea Forge";

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; background: #f8f9fa; color: #0f172a; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; }
main { max-width: 56rem; margin: 0 auto; padding: 4rem 1rem; }
h1.brand { font-size: 2.75rem; font-weight: 300; text-align: center; margin: 0 0 0.5rem; }
p.tagline { text-align: center; color: #64748b; font-size: 1.1rem; font-weight: 300; margin: 0 0 2rem; }
form.card, .panel { background: #fff; border: 1px solid #f1f5f9; border-radius: 1rem; padding: 2rem; box-shadow: 0 1px 2px rgba(0,0,0,0.04); }
form.card { max-width: 42rem; margin: 0 auto; display: grid; gap: 1.5rem; }
label.field { display: grid; gap: 0.5rem; font-size: 0.8rem; font-weight: 500; text-transform: uppercase; letter-spacing: 0.05em; color: #334155; }
textarea, input[type=url] { width: 100%; padding: 1rem; border-radius: 0.75rem; border: 1px solid transparent; background: #f8fafc; font: inherit; font-size: 1rem; text-transform: none; letter-spacing: normal; }
textarea { height: 12rem; resize: none; }
textarea:focus, input[type=url]:focus { outline: none; border-color: #6366f1; background: #fff; }
.types { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.types label { display: flex; justify-content: center; gap: 0.5rem; padding: 1rem; border: 1px solid #e2e8f0; border-radius: 0.75rem; cursor: pointer; font-weight: 500; color: #475569; }
.types input { position: absolute; opacity: 0; }
.types input:checked + span { color: #4338ca; }
.types label:has(input:checked) { border-color: #4f46e5; background: #eef2ff; }
button.primary { padding: 1rem; border: 0; border-radius: 0.75rem; background: #0f172a; color: #fff; font: inherit; font-weight: 500; cursor: pointer; }
button.primary:disabled { opacity: 0.5; cursor: not-allowed; }
.banner { max-width: 42rem; margin: 1.5rem auto 0; padding: 1rem; border-radius: 0.75rem; background: #fef2f2; color: #ef4444; text-align: center; }
.toolbar { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.5rem; }
.toolbar form { margin: 0; }
.link-button { background: none; border: 0; color: #64748b; font: inherit; cursor: pointer; }
.download { padding: 0.5rem 1rem; border: 1px solid #e2e8f0; border-radius: 0.5rem; background: #fff; color: #334155; text-decoration: none; font-size: 0.9rem; font-weight: 500; }
.result { background: #fff; border: 1px solid #f1f5f9; border-radius: 1rem; overflow: hidden; min-height: 60vh; }
.result article { padding: 3rem; line-height: 1.75; font-size: 1.1rem; }
.result article h1 { font-size: 2.25rem; margin-bottom: 2rem; }
.result article h2 { margin-top: 3rem; }
.result article blockquote { border-left: 4px solid #c7d2fe; margin-left: 0; padding-left: 1rem; color: #475569; }
.result iframe { display: block; width: 100%; height: 800px; border: 0; background: #f8fafc; }
.sources { margin-top: 1.5rem; background: #f1f5f9; border-radius: 0.75rem; padding: 1.5rem; }
.sources h3 { margin: 0 0 0.75rem; font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.05em; }
.sources a { display: flex; gap: 0.5rem; align-items: center; color: #4f46e5; font-size: 0.9rem; text-decoration: none; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; padding: 0.2rem 0; }
.sources a:hover { text-decoration: underline; }
"#;

// Keeps the submit button in step with the fields and shows progress once
// the form is posted.
const INPUT_SCRIPT: &str = r#"
(function () {
  var form = document.getElementById("forge");
  var idea = document.getElementById("idea");
  var url = document.getElementById("url");
  var submit = document.getElementById("submit");
  if (!form || submit.dataset.busy === "1") return;
  function sync() { submit.disabled = !idea.value.trim() && !url.value.trim(); }
  idea.addEventListener("input", sync);
  url.addEventListener("input", sync);
  form.addEventListener("submit", function (e) {
    if (!idea.value.trim() && !url.value.trim()) { e.preventDefault(); return; }
    submit.disabled = true;
    submit.textContent = "Forging...";
  });
  sync();
})();
"#;

const EXTERNAL_LINK_ICON: &str = r#"<svg width="12" height="12" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true"><path d="M15 3h6v6"/><path d="M10 14 21 3"/><path d="M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6"/></svg>"#;

fn layout(body: &str, script: Option<&str>) -> String {
    let script = script
        .map(|s| format!("<script>{s}</script>"))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{APP_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n{body}\n</main>\n{script}\n</body>\n</html>\n"
    )
}

fn type_option(value: OutputType, label: &str, selected: OutputType) -> String {
    let checked = if value == selected { " checked" } else { "" };
    format!(
        "<label><input type=\"radio\" name=\"output_type\" value=\"{value}\"{checked}><span>{label}</span></label>"
    )
}

/// Input view, optionally with the error banner
pub fn input_page(draft: &InputDraft, is_generating: bool, error: Option<&str>) -> String {
    let enabled = can_submit(&draft.idea, &draft.url, is_generating);
    let disabled = if enabled { "" } else { " disabled" };
    let (busy, button_text) = if is_generating {
        ("1", "Forging...")
    } else {
        ("0", "Generate Content")
    };
    let banner = error
        .map(|message| format!("<div class=\"banner\" role=\"alert\">{}</div>", escape_html(message)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1 class="brand">{APP_TITLE}</h1>
<p class="tagline">Transform thoughts and URLs into enriched content.</p>
<form id="forge" class="card" method="post" action="/generate">
  <label class="field" for="idea">Your Idea / Thought
    <textarea id="idea" name="idea" placeholder="e.g., The future of sustainable architecture in urban environments...">{idea}</textarea>
  </label>
  <label class="field" for="url">Reference URL (Optional)
    <input id="url" name="url" type="url" placeholder="https://example.com/article" value="{url}">
  </label>
  <div class="types">{article}{webpage}</div>
  <button id="submit" class="primary" type="submit" data-busy="{busy}"{disabled}>{button_text}</button>
</form>
{banner}"#,
        idea = escape_html(&draft.idea),
        url = escape_html(&draft.url),
        article = type_option(OutputType::Article, "Article", draft.output_type),
        webpage = type_option(OutputType::Webpage, "Webpage", draft.output_type),
    );
    layout(&body, Some(INPUT_SCRIPT))
}

fn sources_panel(sources: &[SourceLink<'_>]) -> String {
    if sources.is_empty() {
        return String::new();
    }
    let links: String = sources
        .iter()
        .map(|source| {
            format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{EXTERNAL_LINK_ICON}<span>{}</span></a>\n",
                escape_html(source.uri),
                escape_html(source.label)
            )
        })
        .collect();
    format!("<section class=\"sources\">\n<h3>Sources &amp; Grounding</h3>\n{links}</section>")
}

/// Result view for a displayed generation
pub fn result_page(displayed: &Displayed) -> String {
    let view = match (displayed.output_type, displayed.frame_src()) {
        (OutputType::Webpage, Some(src)) => format!(
            "<iframe src=\"{}\" sandbox=\"{FRAME_SANDBOX}\" title=\"Generated Webpage\"></iframe>",
            escape_html(&src)
        ),
        _ => format!("<article>\n{}</article>", article_html(&displayed.prepared())),
    };
    let body = format!(
        r#"<div class="toolbar">
  <form method="post" action="/reset"><button class="link-button" type="submit">&larr; Back to Input</button></form>
  <a class="download" href="/download" download>Download</a>
</div>
<div class="result">
{view}
</div>
{sources}"#,
        sources = sources_panel(&displayed.sources()),
    );
    layout(&body, None)
}
