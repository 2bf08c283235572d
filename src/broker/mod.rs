pub mod engine;
pub mod message;
pub mod retention;
pub mod topic;

pub use engine::{Broker, PollOutcome, PublishOutcome, SubscribeOutcome, UnsubscribeOutcome};
pub use message::Message;
pub use retention::RetentionPolicy;
