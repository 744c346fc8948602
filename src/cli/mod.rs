pub mod args;
pub mod dispatch;
pub mod prompt;
