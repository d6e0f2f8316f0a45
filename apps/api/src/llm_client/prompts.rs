// Cross-cutting prompt fragments. Feature prompts live next to their callers
// (see assistant/prompts.rs).

/// Appended to any system prompt whose reply is parsed as JSON.
pub const JSON_ONLY_SYSTEM: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
