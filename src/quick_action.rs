use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortcut requests offered next to the chat input.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuickAction {
    PeerMentor,
    Counseling,
    StressResources,
}

#[derive(Debug, Serialize, Clone)]
pub struct QuickActionInfo {
    pub id: &'static str,
    pub label: &'static str,
}

impl QuickAction {
    pub const ALL: [QuickAction; 3] = [
        QuickAction::PeerMentor,
        QuickAction::Counseling,
        QuickAction::StressResources,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            QuickAction::PeerMentor => "peer-mentor",
            QuickAction::Counseling => "counseling",
            QuickAction::StressResources => "stress-resources",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::PeerMentor => "Connect with peer mentor",
            QuickAction::Counseling => "Schedule counseling",
            QuickAction::StressResources => "Get stress resources",
        }
    }

    /// What the visitor is heard asking for, as in "I'd like to <phrase>".
    pub fn phrase(&self) -> &'static str {
        match self {
            QuickAction::PeerMentor => "connect with a peer mentor",
            QuickAction::Counseling => "schedule a counseling session",
            QuickAction::StressResources => "get stress-relief resources",
        }
    }

    pub fn info(&self) -> QuickActionInfo {
        QuickActionInfo {
            id: self.id(),
            label: self.label(),
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownQuickAction(pub String);

impl FromStr for QuickAction {
    type Err = UnknownQuickAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickAction::ALL
            .into_iter()
            .find(|action| action.id() == s)
            .ok_or_else(|| UnknownQuickAction(s.to_string()))
    }
}

/// Text of the synthetic visitor message a quick action appends.
pub fn request_text(action_id: &str) -> String {
    match action_id.parse::<QuickAction>() {
        Ok(action) => format!("I'd like to {}", action.phrase()),
        Err(UnknownQuickAction(raw)) => format!("I'd like to {}", raw),
    }
}
