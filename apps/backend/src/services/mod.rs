pub mod game_flow;
pub mod notifier;
pub mod registry;
pub mod session_actor;
