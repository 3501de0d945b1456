// Shared prompt fragments.
// Each generator that calls the model keeps its own prompts.rs alongside it.

/// Appended to every system prompt: plain text, no commentary.
pub const PLAIN_OUTPUT_INSTRUCTION: &str = "Output the requested content directly. \
    Do NOT add explanations, preambles, or closing remarks. \
    Do NOT wrap the output in code fences.";

/// Joins a role description with the shared output instruction.
pub fn system_prompt(role: &str) -> String {
    format!("{role}\n\n{PLAIN_OUTPUT_INSTRUCTION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_appends_output_rule() {
        let s = system_prompt("You are a copywriter.");
        assert!(s.starts_with("You are a copywriter."));
        assert!(s.ends_with(PLAIN_OUTPUT_INSTRUCTION));
    }
}
