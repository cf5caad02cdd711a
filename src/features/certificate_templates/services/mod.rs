mod template_service;

pub use template_service::TemplateService;
