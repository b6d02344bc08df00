// Prompt fragments owned by the model boundary itself.
// Analysis prompts live in analysis/prompts.rs.

/// Fixed instruction sent with every resume image.
pub const IMAGE_TRANSCRIPTION_PROMPT: &str =
    "Extract all text from this resume image. Return the complete text content.";
