//! Answer generation: prompt assembly and synthesis

mod prompt;
mod synthesizer;

pub use prompt::PromptBuilder;
pub use synthesizer::AnswerSynthesizer;
