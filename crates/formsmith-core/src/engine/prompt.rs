//! System prompts and completion-request builders for the two engine call
//! shapes.
//!
//! Generate and Refine differ only in user-prompt construction: Generate
//! sends the caller's description verbatim, Refine sends the serialized
//! current bundle followed by the edit instruction.

use formsmith_types::bundle::FormBundle;
use formsmith_types::llm::{CompletionRequest, Message};

/// Generation-length budget for a single completion.
pub const MAX_TOKENS: u32 = 2000;

/// Fixed sampling temperature. Non-zero to allow paraphrase variety in
/// titles and follow-ups while staying deterministic enough for schema
/// structure.
pub const TEMPERATURE: f64 = 0.7;

/// System prompt for the *Generate* call shape.
pub const GENERATE_SYSTEM_PROMPT: &str = r#"You are a JSON Schema generator. Given a natural-language description of a form, output a JSON object with the following structure:
{
  "schema": {
    "type": "object",
    "properties": {
      // Define form fields here
    }
  },
  "uiSchema": {
    // UI configuration for each field
  },
  "required": [
    // Array of required field names
  ],
  "followups": [
    // Array of clarification questions if needed
  ]
}

Make sure the schema follows JSON Schema specification and the uiSchema follows react-jsonschema-form conventions."#;

/// System prompt for the *Refine* call shape.
pub const REFINE_SYSTEM_PROMPT: &str = r#"You are a JSON Schema editor. Given the existing schema and a user instruction, update the schema accordingly and output only the modified JSON object with the same structure as before:
{
  "schema": {...},
  "uiSchema": {...},
  "required": [...],
  "followups": [...]
}

Preserve the existing structure and only modify what the user requested."#;

/// Build the completion request for generating a bundle from a description.
pub fn generate_request(model: &str, prompt_text: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(prompt_text)],
        system: Some(GENERATE_SYSTEM_PROMPT.to_string()),
        max_tokens: MAX_TOKENS,
        temperature: Some(TEMPERATURE),
    }
}

/// Build the completion request for refining an existing bundle.
///
/// Fails only if the current bundle cannot be serialized, which would mean
/// the caller holds a corrupt value; the orchestrator treats that as a
/// provider-unavailable condition.
pub fn refine_request(
    model: &str,
    current: &FormBundle,
    instruction: &str,
) -> Result<CompletionRequest, serde_json::Error> {
    let serialized = serde_json::to_string(current)?;
    let user_prompt =
        format!("Current schema: {serialized}\n\nUser instruction: {instruction}");

    Ok(CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(user_prompt)],
        system: Some(REFINE_SYSTEM_PROMPT.to_string()),
        max_tokens: MAX_TOKENS,
        temperature: Some(TEMPERATURE),
    })
}
