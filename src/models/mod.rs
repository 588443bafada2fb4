pub mod analysis;
pub mod document;
pub mod question;
pub mod quiz;

pub use analysis::{AnalysisEntry, FileSummary};
pub use document::Document;
pub use question::{QuestionOption, QuestionRecord, OPTION_LETTERS};
pub use quiz::{QuizEntry, QuizSummary};
