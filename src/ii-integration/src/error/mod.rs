pub mod config;
pub mod handoff;
pub mod identity;
pub mod io;
pub mod session;
pub mod storage;
pub mod structured_file;
pub mod url;
