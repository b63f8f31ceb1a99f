pub mod deploy;
pub mod ps;
