//! States of a single conversational turn.

/// Where a turn currently is.
///
/// ```text
/// AwaitingUser -> ReceptionistThinking -> UserReply -> AwaitingUser
///                          |
///                          v
///               DelegatingToDataEntry -> ToolExecuting -> ReceptionistThinking
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the guest's next message.
    AwaitingUser,
    /// The receptionist is deciding what to do.
    ReceptionistThinking,
    /// A reply is being surfaced to the guest.
    UserReply,
    /// The data entry worker is building a booking request.
    DelegatingToDataEntry,
    /// The booking tool is running.
    ToolExecuting,
}

impl TurnState {
    /// Whether `next` is a legal successor of this state.
    pub fn can_advance_to(self, next: TurnState) -> bool {
        use TurnState::*;
        matches!(
            (self, next),
            (AwaitingUser, ReceptionistThinking)
                | (ReceptionistThinking, UserReply)
                | (ReceptionistThinking, DelegatingToDataEntry)
                | (DelegatingToDataEntry, ToolExecuting)
                | (DelegatingToDataEntry, UserReply)
                | (ToolExecuting, ReceptionistThinking)
                | (UserReply, AwaitingUser)
        )
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingUser => write!(f, "awaiting_user"),
            Self::ReceptionistThinking => write!(f, "receptionist_thinking"),
            Self::UserReply => write!(f, "user_reply"),
            Self::DelegatingToDataEntry => write!(f, "delegating_to_data_entry"),
            Self::ToolExecuting => write!(f, "tool_executing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TurnState::*;

    #[test]
    fn test_delegation_path() {
        let path = [
            AwaitingUser,
            ReceptionistThinking,
            DelegatingToDataEntry,
            ToolExecuting,
            ReceptionistThinking,
            UserReply,
            AwaitingUser,
        ];
        assert!(path.windows(2).all(|w| w[0].can_advance_to(w[1])));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!AwaitingUser.can_advance_to(ToolExecuting));
        assert!(!ToolExecuting.can_advance_to(UserReply));
        assert!(!UserReply.can_advance_to(ReceptionistThinking));
    }
}
