//! Who may act on a pending interaction.

use crate::interaction::Actor;

/// Resolves role and permission facts about an actor.
#[cfg_attr(test, mockall::automock)]
pub trait AuthorizationOracle: Send + Sync {
    fn has_role(&self, actor: &Actor, role_id: u64) -> bool;

    fn is_administrator(&self, actor: &Actor) -> bool;

    /// Roles currently delegated the right to decide, read at routing time.
    fn granted_roles(&self) -> Vec<u64>;
}

/// Capability an actor needs before a reaction is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
    /// Any non-bot account.
    Anyone,
    /// Only the user who invoked the command that posted the message.
    Invoker(u64),
    /// Guild administrators, or holders of any of these roles.
    AdministratorOrRoles(Vec<u64>),
    /// Guild administrators, or holders of a role the oracle reports as
    /// granted when the reaction arrives. Revoking a role takes effect on
    /// interactions that are already pending.
    AdministratorOrGrantedRoles,
}

impl Authorization {
    /// Checks whether `actor` satisfies this capability. Bots never do.
    pub fn permits(&self, actor: &Actor, oracle: &dyn AuthorizationOracle) -> bool {
        if actor.is_bot {
            return false;
        }

        match self {
            Self::Anyone => true,
            Self::Invoker(user_id) => actor.user_id == *user_id,
            Self::AdministratorOrRoles(role_ids) => {
                oracle.is_administrator(actor)
                    || role_ids.iter().any(|role_id| oracle.has_role(actor, *role_id))
            }
            Self::AdministratorOrGrantedRoles => {
                oracle.is_administrator(actor)
                    || oracle
                        .granted_roles()
                        .into_iter()
                        .any(|role_id| oracle.has_role(actor, role_id))
            }
        }
    }
}
