use crate::service::store::StoreError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("Team '{name}' already exists!")]
    TeamExists { name: String },

    #[error("Team '{name}' does not exist!")]
    TeamNotFound { name: String },

    #[error("<@{user_id}> is already in the team!")]
    AlreadyMember { user_id: u64 },

    #[error("User {user_id} is not in the team!")]
    NotMember { user_id: u64 },

    #[error("A team cannot battle itself.")]
    SameTeam,

    #[error("Invalid logo URL. Please provide a valid image URL.")]
    InvalidLogo,

    #[error("StoreError: {0}")]
    Store(#[from] StoreError),
}
