pub mod check;
pub mod config;
pub mod export;
pub mod inspect;
pub mod profile;
pub mod song;
pub mod status;
pub mod writer;

pub use check::run_check;
pub use export::run_export;
pub use status::show_status;

/// Who to record as the actor of audit log entries.
pub(crate) fn current_actor() -> String {
    std::env::var("USER")
        .ok()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| String::from("local"))
}
