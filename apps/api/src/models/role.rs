use serde::{Deserialize, Serialize};

/// The fixed set of coachable roles. Drives prompt phrasing; requests naming
/// any other role are rejected before an LLM call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    AiPm,
    EngManager,
    Designer,
}

impl Role {
    /// Parses a wire-format role code ("ai_pm", "eng_manager", "designer").
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ai_pm" => Some(Role::AiPm),
            "eng_manager" => Some(Role::EngManager),
            "designer" => Some(Role::Designer),
            _ => None,
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Role::AiPm => "AI Product Manager",
            Role::EngManager => "Engineering Manager",
            Role::Designer => "Product Designer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_known_roles() {
        assert_eq!(Role::from_code("ai_pm"), Some(Role::AiPm));
        assert_eq!(Role::from_code("eng_manager"), Some(Role::EngManager));
        assert_eq!(Role::from_code("designer"), Some(Role::Designer));
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        assert_eq!(Role::from_code("barista"), None);
        assert_eq!(Role::from_code(""), None);
        assert_eq!(Role::from_code("AI Product Manager"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Role::AiPm.label(), "AI Product Manager");
        assert_eq!(Role::EngManager.label(), "Engineering Manager");
        assert_eq!(Role::Designer.label(), "Product Designer");
    }

    #[test]
    fn test_serde_round_trip_uses_wire_codes() {
        let json = serde_json::to_string(&Role::EngManager).unwrap();
        assert_eq!(json, r#""eng_manager""#);
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::EngManager);
    }
}
