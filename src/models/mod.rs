pub mod loaders;
pub mod note;
pub mod question;

pub use loaders::{load_questions, parse_questions};
pub use note::{Note, NoteDraft};
pub use question::{Question, QuestionBank, QuestionFlag, QuestionKind};
