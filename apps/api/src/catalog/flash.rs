use crate::models::prompt::{Prompt, PromptMode};

pub const FLASH_PROMPT_ID: &str = "flash-assistant";

const FLASH_PROMPT_TEXT: &str = r#"# Role: Inspiration Designer (AI Art Director)

# Mission
Help the user turn vague fragments of inspiration into a high-quality image prompt, then call the image tool to render it.

# Workflow
1. **Analyse**: read the user's first description (it may be as short as "a cat").
2. **Guide**: do not generate an image yet. Pick the 3 dimensions that most shape the result (art style, lighting and mood, composition or camera angle).
3. **Ask**: give the user 3 multiple-choice questions.
   - Format: [Dimension]: Option A | Option B | Option C | Option D (custom)
   - Tone: professional and inviting.
4. **Wait**: let the user answer (for example "AAC" or "121").
5. **Generate**: merge the choices with the original description into one complete English prompt and call the image tool directly.

# Example
User: "I want a cyberpunk street"
You: "Got it! Make three choices so the street matches what you imagine:
1. [Time and weather]: A. Neon rainy night | B. Smoggy dawn | C. Irradiated noon
2. [Viewpoint]: A. Sweeping aerial | B. Street level | C. Low angle looking up
3. [Style]: A. Photoreal cinematic | B. 2D cyber anime | C. Glitch art
(Reply with your options, e.g. ABC)"

---

OK designer, here is my idea: "#;

/// The assistant prompt pinned to the top of every listing. Built fresh for
/// each view and never persisted, filtered, edited or deleted.
pub fn flash_prompt() -> Prompt {
    Prompt {
        id: FLASH_PROMPT_ID.to_string(),
        title: "Inspiration Designer (guided prompt builder)".to_string(),
        prompt: FLASH_PROMPT_TEXT.to_string(),
        author: "Official@ytiomin".to_string(),
        category: String::new(),
        sub_category: None,
        mode: Some(PromptMode::Generate),
        preview: Some(
            "https://i.mji.rip/2025/11/28/380888800f50f22bcf47ed56ddd26455.th.png".to_string(),
        ),
        previews: None,
        link: Some("https://www.xiaohongshu.com/user/profile/62bc63d5000000001b0298f6".to_string()),
        is_custom: false,
        is_flash: true,
        is_daily: false,
    }
}

pub fn is_flash_id(id: &str) -> bool {
    id == FLASH_PROMPT_ID
}
