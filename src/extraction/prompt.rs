use crate::models::Message;

use super::schema::JSON_TEMPLATE;

pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are a correspondence analysis assistant. Your ONLY role is to read one
message (email or chat) and extract what it requires of the recipient.

RULES (ABSOLUTE, NO EXCEPTIONS):
1. Extract ONLY information explicitly present in the message.
2. NEVER invent obligations, deadlines, amounts, or entities.
3. If a field is unclear or missing, output null for that field.
4. Obligation triggers use exactly one of: "immediate", "date:YYYY-MM-DD",
   "event:<short description>".
5. Deadlines written as calendar dates go under "absolute"; deadlines
   expressed as a window after an event go under "relative"; repeating
   deadlines go under "recurring".
6. priority is 1 (most urgent) to 5 (least urgent).
7. confidence_score reflects your certainty over the WHOLE extraction,
   0.00 to 1.00.
8. Output MUST be a single valid JSON object wrapped in ```json``` fences.
   Every top-level section must be present; use empty arrays where nothing
   was found.
"#;

/// Build the extraction prompt for one message.
///
/// Plain-text body preferred, HTML body as fallback; sender, subject, and an
/// ISO-8601 receive timestamp are prepended so the model can resolve
/// relative wording.
pub fn build_extraction_prompt(message: &Message) -> String {
    let subject_line = match &message.subject {
        Some(subject) => format!("Subject: {subject}\n"),
        None => String::new(),
    };

    format!(
        r#"<message>
From: {sender}
{subject_line}Received: {received}

{body}
</message>

Extract ALL obligations, deadlines, entities, financial significance,
attachment notes, and storage advice from the above message into the
following JSON structure. For any field not present, use null.

```json
{template}
```
"#,
        sender = message.sender_display(),
        received = message.received_at.to_rfc3339(),
        body = message.analysis_body(),
        template = JSON_TEMPLATE,
    )
}
