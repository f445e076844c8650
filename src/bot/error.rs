#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BotError {
    #[error("Invalid argument for {parameter}: {reason}")]
    InvalidCommandArgument { parameter: String, reason: String },

    #[error("This command can only be used in a server.")]
    GuildOnlyCommand,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotInVoiceChannel(String),
}
