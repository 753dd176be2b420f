use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Tool configuration surface, opaque to the toolbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOptions(pub Value);

/// One entry of a button section: either a tool or a reference to a nested section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolNode {
    pub id: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub options: Option<ToolOptions>,
    #[serde(default)]
    pub child_section: Option<SectionId>,
}

impl ToolNode {
    pub fn tool(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_active: false,
            options: None,
            child_section: None,
        }
    }

    pub fn section(id: impl Into<String>, child: impl Into<SectionId>) -> Self {
        Self {
            child_section: Some(child.into()),
            ..Self::tool(id)
        }
    }

    pub fn active(mut self) -> Self {
        self.is_active = true;
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(ToolOptions(options));
        self
    }

    pub fn is_section(&self) -> bool {
        self.child_section.is_some()
    }
}
