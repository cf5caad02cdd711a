mod student;

pub use student::{StudentRecord, STUDENT_RECORD_SELECT};
