// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "monsters/mod.rs"]
pub mod monsters;
