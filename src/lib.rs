// Tap Sim chat bot: lookup engine over the Tap Sim statistics API plus the
// periodic hatch leaderboard post.

pub mod api;
pub mod commands;
pub mod config;
pub mod detector;
pub mod error;
pub mod fields;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod notifier;
pub mod poster;
pub mod render;
pub mod upstream;
