pub mod gemini_api;
pub mod odds_api;
pub mod prompts;
