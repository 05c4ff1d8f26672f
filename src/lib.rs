pub mod error;
pub mod flags;
pub mod shell;

pub mod highlight;
pub mod history;
pub mod process;
pub mod session;
pub mod tokenizer;
