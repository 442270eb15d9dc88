pub mod batch_parser;
pub mod export;
pub mod history_store;
pub mod llm_service;
pub mod style_registry;

pub use batch_parser::{count_questions, is_question_boundary, parse_questions};
pub use export::ExportFormat;
pub use history_store::HistoryStore;
pub use llm_service::{AnswerGenerator, LlmService, QuestionSuggester};
pub use style_registry::StyleRegistry;
