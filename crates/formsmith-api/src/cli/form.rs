//! Form CLI commands: generate, list, api-key.

use anyhow::Result;
use console::style;

use crate::http::extractors::auth::{default_owner_id, ensure_api_key};
use crate::state::AppState;

/// Generate a form from a prompt and print the result.
///
/// # Examples
///
/// ```bash
/// formsmith generate "an RSVP form with name, email and dietary notes"
/// formsmith generate "customer feedback" --title "Feedback"
/// ```
pub async fn generate_form(
    state: &AppState,
    prompt: &str,
    title: Option<String>,
    json: bool,
) -> Result<()> {
    let owner_id = default_owner_id(state).await?;
    let (form, followups) = state
        .form_service
        .generate_form(&owner_id, title, prompt)
        .await?;

    if json {
        let out = serde_json::json!({
            "form": form,
            "followups": followups,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} Form generated!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Title:").bold(), style(&form.title).cyan());
    println!("  {}  {}", style("ID:").bold(), style(form.id.to_string()).dim());
    println!("  {}  v{}", style("Version:").bold(), form.version);
    println!();
    println!("  {}", style("Fields:").bold());
    for (name, field) in &form.bundle.schema.properties {
        let required = if form.bundle.required.contains(name) {
            style(" (required)").dim().to_string()
        } else {
            String::new()
        };
        println!(
            "    {} {} [{}]{}",
            style("•").dim(),
            name,
            field.field_type,
            required
        );
    }
    if !followups.is_empty() {
        println!();
        println!("  {}", style("Follow-up questions:").bold());
        for q in &followups {
            println!("    {} {}", style("?").yellow(), q);
        }
    }
    println!();
    println!(
        "  Share link: {}",
        style(format!("/api/v1/forms/{}", form.id)).dim()
    );
    println!();

    Ok(())
}

/// List the caller's forms in a compact table.
pub async fn list_forms(state: &AppState, json: bool) -> Result<()> {
    let owner_id = default_owner_id(state).await?;
    let forms = state.form_service.list_forms(&owner_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&forms)?);
        return Ok(());
    }

    if forms.is_empty() {
        println!();
        println!(
            "  No forms yet. Create one with {}",
            style("formsmith generate \"<prompt>\"").cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    for entry in &forms {
        println!(
            "  {}  v{}  {} responses  {}",
            style(&entry.form.title).cyan(),
            entry.form.version,
            entry.response_count,
            style(entry.form.id.to_string()).dim()
        );
    }
    println!();

    Ok(())
}

/// Ensure an API key exists and print it (plaintext is only available on
/// first creation).
pub async fn api_key(state: &AppState, json: bool) -> Result<()> {
    let key = ensure_api_key(state).await?;

    if json {
        println!("{}", serde_json::json!({"api_key": key}));
        return Ok(());
    }

    if key.starts_with("fsm_") {
        println!();
        println!(
            "  {} API key generated (save this -- it won't be shown again):",
            style("🔑").bold()
        );
        println!();
        println!("  {}", style(&key).yellow().bold());
        println!();
    } else {
        println!();
        println!("  {}", style(&key).dim());
        println!();
    }

    Ok(())
}
