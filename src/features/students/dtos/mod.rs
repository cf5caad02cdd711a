pub mod student_dto;

pub use student_dto::{
    CreateStudentDto, StudentQueryParams, StudentResponseDto, UpdateStudentDto,
};
