//! Instruction templates for UI code generation
//!
//! Each target framework has its own system prompt; the user prompt is a
//! handlebars template with substitution points for the description and the
//! optional repository context. Templates are process-wide constants and are
//! never mutated at runtime.

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};

use crate::types::GenerationRequest;

/// Target UI framework - selects the instruction template pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    Svelte,
    React,
    Vue,
    Html,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Svelte => "svelte",
            Framework::React => "react",
            Framework::Vue => "vue",
            Framework::Html => "html",
        }
    }

    pub fn all() -> &'static [Framework] {
        &[
            Framework::Svelte,
            Framework::React,
            Framework::Vue,
            Framework::Html,
        ]
    }

    fn system_prompt(&self) -> &'static str {
        match self {
            Framework::Svelte => SYSTEM_PROMPT_SVELTE,
            Framework::React => SYSTEM_PROMPT_REACT,
            Framework::Vue => SYSTEM_PROMPT_VUE,
            Framework::Html => SYSTEM_PROMPT_HTML,
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svelte" => Ok(Framework::Svelte),
            "react" | "jsx" | "tsx" => Ok(Framework::React),
            "vue" => Ok(Framework::Vue),
            "html" | "plain" => Ok(Framework::Html),
            other => Err(format!(
                "Unknown framework '{}'. Expected one of: svelte, react, vue, html",
                other
            )),
        }
    }
}

/// Error types for template rendering
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

const SYSTEM_PROMPT_SVELTE: &str = r#"You are a Svelte UI generation agent. Your task is to create a single Svelte 5 component from the user's description.

## Rules

- Use Svelte 5 runes syntax: `$state()`, `$derived()`, `$effect()`, `$props()`.
- NEVER use `export let` or `on:click` style handlers (use `onclick`).
- Style with Tailwind CSS utility classes only; no inline styles, no <style> blocks.
- The component must be self-contained and ready to drop into a project.

## Output

Reply with exactly one fenced code block containing the complete component. A short usage note after the block is fine; no other prose.
"#;

const SYSTEM_PROMPT_REACT: &str = r#"You are a React UI generation agent. Your task is to create a single React function component from the user's description.

## Rules

- Function components and hooks only; no class components.
- TypeScript props interface when the component takes props.
- Style with Tailwind CSS utility classes only; no inline styles, no CSS files.
- The component must be self-contained: all imports included, default export present.

## Output

Reply with exactly one fenced code block containing the complete component. A short usage note after the block is fine; no other prose.
"#;

const SYSTEM_PROMPT_VUE: &str = r#"You are a Vue UI generation agent. Your task is to create a single Vue 3 single-file component from the user's description.

## Rules

- Composition API with `<script setup>`; no Options API.
- Style with Tailwind CSS utility classes only; no <style> blocks.
- The component must be a complete .vue file: template, script, nothing else needed.

## Output

Reply with exactly one fenced code block containing the complete component. A short usage note after the block is fine; no other prose.
"#;

const SYSTEM_PROMPT_HTML: &str = r#"You are a UI generation agent. Your task is to create a single self-contained HTML fragment from the user's description.

## Rules

- Plain HTML with Tailwind CSS utility classes; inline <script> only when the description requires behavior.
- No external assets beyond the Tailwind CDN.
- The fragment must render standalone when pasted into a page body.

## Output

Reply with exactly one fenced code block containing the complete fragment. A short usage note after the block is fine; no other prose.
"#;

/// User prompt for a fresh generation
const USER_TEMPLATE: &str = r#"{{#if context}}Reference files from the user's repository. Match their conventions, naming, and visual style where it makes sense:

{{#each context}}--- {{this.path}} ---
{{this.contents}}

{{/each}}{{/if}}Create this UI component:

{{description}}
"#;

/// User prompt for feedback-driven refinement
const REFINE_TEMPLATE: &str = r#"Original component:

```
{{code}}
```

Feedback:

{{feedback}}

Improve the component based on the feedback. Reply with exactly one fenced code block containing the complete, updated component.
"#;

fn renderer() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    // Prompts are plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
}

/// Render the system and user messages for a generation request
pub fn render(request: &GenerationRequest) -> Result<(String, String), PromptError> {
    let data = serde_json::json!({
        "description": request.description,
        "context": request.context,
    });
    let user = renderer().render_template(USER_TEMPLATE, &data)?;
    Ok((request.framework.system_prompt().to_string(), user))
}

/// Render the system and user messages for a refinement request
pub fn render_refine(
    code: &str,
    feedback: &str,
    framework: Framework,
) -> Result<(String, String), PromptError> {
    let data = serde_json::json!({
        "code": code,
        "feedback": feedback,
    });
    let user = renderer().render_template(REFINE_TEMPLATE, &data)?;
    Ok((framework.system_prompt().to_string(), user))
}
