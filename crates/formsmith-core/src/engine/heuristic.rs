//! Deterministic keyword-driven fallback generator.
//!
//! This is the engine's availability floor: every other generation path may
//! fail outward to here, so it is total, synchronous, and dependency-free.
//! Predicates are tested in a fixed order, and that order is also the
//! field-emission order, which fixes `schema.properties` insertion order and
//! therefore column ordering downstream. Do not reorder the predicate table.

use formsmith_types::bundle::{FieldSchema, FormBundle, UiHints};

/// Advisory follow-up attached to every heuristic bundle.
pub const FALLBACK_ADVISORY: &str = "This is a basic form generated from your \
description. You can edit it to add more specific fields.";

/// Generate a bundle from raw prompt text. Total function, never fails.
///
/// Lower-cases the prompt, tests each keyword predicate in order, and emits
/// one fixed field per match, marking it required. When nothing matches,
/// emits a default two-field bundle (name, email) so the result is never
/// empty.
pub fn generate(prompt_text: &str) -> FormBundle {
    let prompt = prompt_text.to_lowercase();
    let mut bundle = FormBundle::empty();

    if prompt.contains("name") || prompt.contains("full name") {
        push_field(
            &mut bundle,
            "name",
            FieldSchema::string("Full Name"),
            UiHints::placeholder("Enter your full name"),
        );
    }

    if prompt.contains("email") || prompt.contains("e-mail") {
        push_field(
            &mut bundle,
            "email",
            FieldSchema::string_with_format("Email", "email"),
            UiHints::placeholder("Enter your email address"),
        );
    }

    if prompt.contains("phone") || prompt.contains("mobile") || prompt.contains("contact") {
        push_field(
            &mut bundle,
            "phone",
            FieldSchema::string("Phone Number"),
            UiHints::placeholder("Enter your phone number"),
        );
    }

    if prompt.contains("message") || prompt.contains("comment") || prompt.contains("feedback") {
        push_field(
            &mut bundle,
            "message",
            FieldSchema::string_with_format("Message", "textarea"),
            UiHints {
                placeholder: Some("Enter your message".to_string()),
                widget: Some("textarea".to_string()),
            },
        );
    }

    if prompt.contains("age") {
        push_field(
            &mut bundle,
            "age",
            FieldSchema::number_in_range("Age", 0.0, 120.0),
            UiHints::placeholder("Enter your age"),
        );
    }

    if prompt.contains("company") || prompt.contains("organization") {
        push_field(
            &mut bundle,
            "company",
            FieldSchema::string("Company/Organization"),
            UiHints::placeholder("Enter your company name"),
        );
    }

    // Nothing matched: a form must never be empty.
    if bundle.schema.properties.is_empty() {
        push_field(
            &mut bundle,
            "name",
            FieldSchema::string("Name"),
            UiHints::placeholder("Enter your name"),
        );
        push_field(
            &mut bundle,
            "email",
            FieldSchema::string_with_format("Email", "email"),
            UiHints::placeholder("Enter your email"),
        );
    }

    bundle.followups.push(FALLBACK_ADVISORY.to_string());
    bundle
}

/// Append one field, its UI hints, and its required marks in both the
/// top-level and mirrored `schema.required` lists.
fn push_field(bundle: &mut FormBundle, name: &str, field: FieldSchema, hints: UiHints) {
    bundle.schema.properties.insert(name.to_string(), field);
    bundle.ui_schema.insert(name.to_string(), hints);
    bundle.schema.required.push(name.to_string());
    bundle.required.push(name.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsmith_types::bundle::FieldType;

    #[test]
    fn test_name_and_email_prompt() {
        let bundle = generate("Create a form with name and email");
        assert_eq!(bundle.field_names(), vec!["name", "email"]);
        assert_eq!(bundle.required, vec!["name", "email"]);
        assert_eq!(bundle.schema.required, vec!["name", "email"]);
        assert_eq!(bundle.followups.len(), 1);
    }

    #[test]
    fn test_unmodeled_keywords_are_skipped() {
        // "rating" has no predicate; only the message/comment/feedback
        // predicate fires.
        let bundle = generate("feedback form with rating and comments");
        assert_eq!(bundle.field_names(), vec!["message"]);
        assert_eq!(bundle.required, vec!["message"]);
        assert_eq!(
            bundle.ui_schema["message"].widget.as_deref(),
            Some("textarea")
        );
    }

    #[test]
    fn test_no_match_emits_default_bundle() {
        let bundle = generate("something entirely unrelated");
        assert_eq!(bundle.field_names(), vec!["name", "email"]);
        assert_eq!(bundle.required, vec!["name", "email"]);
        assert_eq!(bundle.followups, vec![FALLBACK_ADVISORY.to_string()]);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let a = generate("contact form with name, email, phone and age");
        let b = generate("contact form with name, email, phone and age");
        assert_eq!(a, b);
        // Emission order follows predicate order, not prompt word order.
        assert_eq!(a.field_names(), vec!["name", "email", "phone", "age"]);
    }

    #[test]
    fn test_contact_matches_phone_predicate() {
        // "contact" alone fires the phone predicate; precedence is the
        // enumeration order, by contract.
        let bundle = generate("a contact form");
        assert!(bundle.schema.properties.contains_key("phone"));
    }

    #[test]
    fn test_age_field_bounds() {
        let bundle = generate("ask for age");
        let age = &bundle.schema.properties["age"];
        assert_eq!(age.field_type, FieldType::Number);
        assert_eq!(age.minimum, Some(0.0));
        assert_eq!(age.maximum, Some(120.0));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let bundle = generate("NAME and EMAIL please");
        assert_eq!(bundle.field_names(), vec!["name", "email"]);
    }
}
