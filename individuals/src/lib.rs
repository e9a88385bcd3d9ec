pub mod nim_policy;
pub mod target_string;
