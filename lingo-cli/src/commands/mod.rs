pub mod init;
pub mod mappings;
pub mod plan;
