// prompt.rs

/// Appended to a refined prompt before it goes to image generation.
pub const NO_TEXT_SUFFIX: &str = "\n\nNo text, no watermarks, no logos.";

pub const REFINE_INSTRUCTION: &str =
    "Refine this prompt for text-to-image. Return only the improved prompt, no commentary:";

/// Shown (and used) when the user has not typed a concept of their own.
pub const DEFAULT_CONCEPT: &str = "\"Imagine a sleek smartwatch glowing under stormy skies atop a futuristic cityscape at night. 
Rain reflects its luminous interface, symbolizing human resilience against chaos. 
The scene evokes a cyberpunk thriller where time is power—each second counts.\"";

pub fn refine_instruction(prompt: &str) -> String {
    format!("{}\n\n{}", REFINE_INSTRUCTION, prompt)
}

/// Instruction block sent for a poster. Pure: same inputs, same bytes.
pub fn build_base_prompt(concept: &str, ratio: &str, width: u32, height: u32) -> String {
    format!(
        "You are an image prompt designer for cinematic product posters. Create a single, stunning, photorealistic poster that:
- Preserves the product's original lighting, texture, and color fidelity.
- Matches this aspect ratio: {ratio} (target ~{width}x{height}).
- Emphasizes premium, cinematic mood with depth, soft volumetric lighting, subtle film grain.
- Composition: rule of thirds, clear focal subject, tasteful negative space.
- Background: cohesive to concept, no watermarks, no text, no logos.

Concept:
{concept}

Output: A single image only."
    )
    .trim()
    .to_string()
}

pub fn with_no_text_suffix(refined: &str) -> String {
    format!("{}{}", refined, NO_TEXT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_prompt_is_deterministic() {
        let first = build_base_prompt("a red shoe", "1:1", 1024, 1024);
        let second = build_base_prompt("a red shoe", "1:1", 1024, 1024);
        assert_eq!(first, second);
    }

    #[test]
    fn base_prompt_embeds_inputs_and_directives() {
        let prompt = build_base_prompt("a red shoe on a white background", "9:16", 768, 1365);
        assert!(prompt.starts_with("You are an image prompt designer"));
        assert!(prompt.contains("Matches this aspect ratio: 9:16 (target ~768x1365)."));
        assert!(prompt.contains("Concept:\na red shoe on a white background\n"));
        assert!(prompt.contains("rule of thirds"));
        assert!(prompt.contains("no watermarks, no text, no logos"));
        assert!(prompt.ends_with("Output: A single image only."));
    }

    #[test]
    fn empty_concept_keeps_layout() {
        let prompt = build_base_prompt("", "1:1", 1, 1);
        assert!(prompt.ends_with("Concept:\n\n\nOutput: A single image only."));
    }

    #[test]
    fn refine_instruction_wraps_prompt() {
        assert_eq!(
            refine_instruction("sunset"),
            "Refine this prompt for text-to-image. Return only the improved prompt, no commentary:\n\nsunset"
        );
    }

    #[test]
    fn placeholder_concept_keeps_line_endings() {
        let lines: Vec<&str> = DEFAULT_CONCEPT.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("at night. "));
        assert!(lines[1].ends_with("against chaos. "));
        assert!(lines[2].ends_with("each second counts.\""));
    }

    #[test]
    fn suffix_is_appended_verbatim() {
        assert_eq!(
            with_no_text_suffix("refined"),
            "refined\n\nNo text, no watermarks, no logos."
        );
    }
}
