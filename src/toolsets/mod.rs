//! Toolset registry
//!
//! Tools are grouped into named toolsets. Each toolset is enabled or disabled as a
//! whole and splits its tools into read and write lists, so read-only mode can hide
//! every mutating tool without touching the enable state.

/// Reserved toolset name that enables every registered toolset
pub const ALL_TOOLSETS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolsetError {
    #[error("no toolsets specified")]
    Empty,
    #[error("toolset '{0}' not found")]
    NotFound(String),
    #[error("toolset '{0}' is already enabled")]
    AlreadyEnabled(String),
}

/// Named bundle of tools with independent read and write lists
#[derive(Debug, Clone)]
pub struct Toolset {
    name: String,
    description: String,
    enabled: bool,
    read_only: bool,
    read_tools: Vec<String>,
    write_tools: Vec<String>,
}

impl Toolset {
    /// Creates an empty, disabled toolset.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            enabled: false,
            read_only: false,
            read_tools: Vec::new(),
            write_tools: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn add_read_tools<I, S>(&mut self, tools: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read_tools.extend(tools.into_iter().map(Into::into));
        self
    }

    pub fn add_write_tools<I, S>(&mut self, tools: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write_tools.extend(tools.into_iter().map(Into::into));
        self
    }

    /// Every registered tool, regardless of enable state or read-only mode
    pub fn all_tools(&self) -> impl Iterator<Item = &str> {
        self.read_tools
            .iter()
            .chain(self.write_tools.iter())
            .map(String::as_str)
    }

    /// Tools that are callable right now.
    ///
    /// Empty when disabled; read tools only in read-only mode.
    pub fn active_tools(&self) -> Vec<&str> {
        if !self.enabled {
            return Vec::new();
        }
        let mut tools: Vec<&str> = self.read_tools.iter().map(String::as_str).collect();
        if !self.read_only {
            tools.extend(self.write_tools.iter().map(String::as_str));
        }
        tools
    }

    /// Number of tools this toolset exposes once enabled
    pub fn tool_count(&self) -> usize {
        if self.read_only {
            self.read_tools.len()
        } else {
            self.read_tools.len() + self.write_tools.len()
        }
    }
}

/// Summary of a toolset for discovery listings
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ToolsetInfo {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub tool_count: usize,
}

/// All toolsets known to the server, in registration order
#[derive(Debug, Clone, Default)]
pub struct ToolsetGroup {
    toolsets: Vec<Toolset>,
    read_only: bool,
}

impl ToolsetGroup {
    pub fn new(read_only: bool) -> Self {
        Self {
            toolsets: Vec::new(),
            read_only,
        }
    }

    /// Registers a toolset. Read-only mode of the group is applied to it.
    pub fn add_toolset(&mut self, mut toolset: Toolset) {
        if self.read_only {
            toolset.set_read_only(true);
        }
        self.toolsets.push(toolset);
    }

    pub fn toolset(&self, name: &str) -> Option<&Toolset> {
        self.toolsets.iter().find(|toolset| toolset.name == name)
    }

    pub fn toolsets(&self) -> &[Toolset] {
        &self.toolsets
    }

    /// Enables the named toolsets.
    ///
    /// `"all"` anywhere in the list enables every toolset. Names match exactly.
    /// Toolsets that are already enabled stay enabled. Nothing is changed when a
    /// name is unknown.
    pub fn enable_toolsets<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ToolsetError> {
        let names: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
        if names.is_empty() {
            return Err(ToolsetError::Empty);
        }

        if names.contains(&ALL_TOOLSETS) {
            for toolset in &mut self.toolsets {
                toolset.set_enabled(true);
            }
            return Ok(());
        }

        if let Some(unknown) = names.iter().find(|name| self.toolset(name).is_none()) {
            return Err(ToolsetError::NotFound(unknown.to_string()));
        }

        for name in names {
            if let Some(toolset) = self.toolset_mut(name) {
                toolset.set_enabled(true);
            }
        }
        Ok(())
    }

    /// Enables a single toolset, failing if it is unknown or already enabled.
    pub fn enable_toolset(&mut self, name: &str) -> Result<(), ToolsetError> {
        let toolset = self
            .toolset_mut(name)
            .ok_or_else(|| ToolsetError::NotFound(name.to_string()))?;
        if toolset.is_enabled() {
            return Err(ToolsetError::AlreadyEnabled(name.to_string()));
        }
        toolset.set_enabled(true);
        Ok(())
    }

    pub fn list_toolsets(&self) -> Vec<ToolsetInfo> {
        self.toolsets
            .iter()
            .map(|toolset| ToolsetInfo {
                name: toolset.name.clone(),
                description: toolset.description.clone(),
                enabled: toolset.enabled,
                tool_count: toolset.tool_count(),
            })
            .collect()
    }

    /// Names of every tool currently callable
    pub fn active_tool_names(&self) -> Vec<&str> {
        self.toolsets
            .iter()
            .flat_map(|toolset| toolset.active_tools())
            .collect()
    }

    pub fn is_tool_active(&self, tool_name: &str) -> bool {
        self.toolsets
            .iter()
            .any(|toolset| toolset.active_tools().contains(&tool_name))
    }

    fn toolset_mut(&mut self, name: &str) -> Option<&mut Toolset> {
        self.toolsets.iter_mut().find(|toolset| toolset.name == name)
    }
}
