#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InteractionError {
    #[error("Message {message_id} already has a pending interaction")]
    DuplicateRegistration { message_id: u64 },
}
