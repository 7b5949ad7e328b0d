pub mod answer_evaluator;
pub mod note_recorder;
pub mod note_writer;

pub use answer_evaluator::{grade, grade_choice, AnswerEvaluator, Verdict};
pub use note_recorder::NoteRecorder;
pub use note_writer::NoteWriter;
