//! Application runtime composition modules.

pub(crate) mod config_file;
pub(crate) mod config_manager;
pub(crate) mod exit_handler;
pub(crate) mod one_shot;
pub(crate) mod output;
pub(crate) mod progress;
pub(crate) mod runtime;
pub(crate) mod session_loop;
pub(crate) mod terminal;
#[cfg(test)]
pub(crate) mod test_session;
