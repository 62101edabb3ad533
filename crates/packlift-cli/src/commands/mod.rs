pub mod install;
pub mod publish;
