use serde::{Deserialize, Serialize};

/// One configured instruction, app connector or resource of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    /// Highlight flag for freshly added items, cleared after a short delay.
    #[serde(default)]
    pub is_new: bool,
}

impl SettingItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            note: None,
            config: None,
            is_new: false,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    pub fn highlighted(mut self) -> Self {
        self.is_new = true;
        self
    }
}

/// Which settings list of an agent an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    Instruction,
    App,
    Resource,
}

impl std::fmt::Display for SettingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingKind::Instruction => write!(f, "instruction"),
            SettingKind::App => write!(f, "app"),
            SettingKind::Resource => write!(f, "resource"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default)]
    pub instructions: Vec<SettingItem>,
    #[serde(default)]
    pub apps: Vec<SettingItem>,
    #[serde(default)]
    pub resources: Vec<SettingItem>,
}

impl AgentSettings {
    pub fn list(&self, kind: SettingKind) -> &Vec<SettingItem> {
        match kind {
            SettingKind::Instruction => &self.instructions,
            SettingKind::App => &self.apps,
            SettingKind::Resource => &self.resources,
        }
    }

    pub fn list_mut(&mut self, kind: SettingKind) -> &mut Vec<SettingItem> {
        match kind {
            SettingKind::Instruction => &mut self.instructions,
            SettingKind::App => &mut self.apps,
            SettingKind::Resource => &mut self.resources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Fixed agents are system agents and cannot be deleted.
    #[serde(default)]
    pub fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AgentSettings>,
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            desc: None,
            fixed: false,
            settings: None,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Applies every present field of `patch` to this agent.
    pub fn apply(&mut self, patch: AgentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(desc) = patch.desc {
            self.desc = Some(desc);
        }
        if let Some(fixed) = patch.fixed {
            self.fixed = fixed;
        }
        if let Some(settings) = patch.settings {
            self.settings = Some(settings);
        }
    }
}

/// Input to agent creation; the service assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default)]
    pub settings: Option<AgentSettings>,
}

impl NewAgent {
    pub fn into_agent(self, id: impl Into<String>) -> Agent {
        Agent {
            id: id.into(),
            name: self.name,
            role: self.role,
            desc: self.desc,
            fixed: self.fixed,
            settings: self.settings,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AgentSettings>,
}
