pub mod notifiers;
pub mod providers;
pub mod scenario;
