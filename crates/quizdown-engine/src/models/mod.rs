pub mod answer;
pub mod config;
pub mod questionnaire;

pub use answer::{Answer, AnswerData, QuizState, QuizSubmission};
pub use config::{QuizConfig, QuizOptions, SubmitHandler};
pub use questionnaire::{
    Choice, MarkdownBlock, Page, Question, QuestionType, QuestionsBlock, Section, SectionContent,
};
