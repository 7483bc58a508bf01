/// Structured layout the host derives for an artifact path
/// (organization / module / revision, plus an optional integration revision
/// for snapshot and pre-release builds).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLayout {
    pub organization: Option<String>,
    pub module: Option<String>,
    pub base_revision: Option<String>,
    pub file_integration_revision: Option<String>,
}

impl FileLayout {
    pub fn new(
        organization: Option<String>,
        module: Option<String>,
        base_revision: Option<String>,
        file_integration_revision: Option<String>,
    ) -> Self {
        Self {
            organization,
            module,
            base_revision,
            file_integration_revision,
        }
    }

    /// Well-formed when the organization/module/revision triple is complete.
    pub fn is_valid(&self) -> bool {
        [&self.organization, &self.module, &self.base_revision]
            .iter()
            .all(|part| part.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn base_revision(&self) -> Option<&str> {
        self.base_revision.as_deref()
    }
}

impl std::str::FromStr for FileLayout {
    type Err = String;

    /// Parses `organization:module:revision[:integration]`; empty parts are absent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(format!(
                "Invalid layout: {}. Expected organization:module:revision[:integration]",
                s
            ));
        }

        let part = |i: usize| {
            parts
                .get(i)
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(String::from)
        };

        Ok(Self::new(part(0), part(1), part(2), part(3)))
    }
}
