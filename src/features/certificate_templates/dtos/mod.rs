pub mod template_dto;

pub use template_dto::{
    CreateTemplateDto, TemplateResponseDto, UpdateTemplateDto, UploadBackgroundDto,
};
