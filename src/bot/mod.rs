/// Command and callback handlers
pub mod handlers;
/// Pending-link store keyed by chat
pub mod links;
/// Error classification and user-facing message strategies
pub mod messages;
/// Outbound media dispatch seam
pub mod outbound;
/// Resolution and delivery pipeline
pub mod pipeline;
/// Content-type selection prompt
pub mod selection;

pub use links::PendingLinks;
