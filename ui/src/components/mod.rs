pub mod agent_creation_form;
pub mod chat_interface;
pub mod code_block;
pub mod document_upload;
pub mod loading_spinner;
pub mod sidebar;
pub mod tool_manager;
pub mod welcome_screen;
