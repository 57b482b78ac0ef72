//! 自适应词汇测验核心：能力估计、复习调度、选词、干扰项与出题。

pub mod ability;
pub mod assembler;
pub mod distractors;
pub mod modes;
pub mod repository;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use repository::QuizRepository;
pub use session::{placement_quiz, record_answer, start_session, QuizError};
