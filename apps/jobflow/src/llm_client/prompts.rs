// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces plain-text output.
pub const PLAIN_TEXT_ONLY_SYSTEM: &str = "You respond with the requested document only. \
    Do NOT wrap the answer in markdown code fences. \
    Do NOT include explanations, preambles or apologies.";

/// Common instruction appended to all resume-rewriting prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim in your output must come from the original resume. \
    Do NOT invent employers, titles, dates, degrees, metrics or skills. \
    You may reorder, rephrase and emphasize existing content; you may not add facts.";
