//! Project configuration: one closed connection variant per data source
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::data_model::BuildInfo;

/// Kind of data source a project is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Api,
    Ftp,
    Local,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProjectKind::Api => write!(f, "api"),
            ProjectKind::Ftp => write!(f, "ftp"),
            ProjectKind::Local => write!(f, "local"),
        }
    }
}

fn default_ftp_port() -> u16 {
    21
}

/// Connection details, validated by shape at deserialization time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Connection {
    Api {
        api_endpoint: String,
        token: String,
        project_key: String,
    },
    Ftp {
        host: String,
        #[serde(default = "default_ftp_port")]
        port: u16,
        username: String,
        password: String,
        base_path: String,
    },
    Local {
        build_info_file: PathBuf,
        file_list_file: PathBuf,
    },
}

impl Connection {
    pub fn kind(&self) -> ProjectKind {
        match self {
            Connection::Api { .. } => ProjectKind::Api,
            Connection::Ftp { .. } => ProjectKind::Ftp,
            Connection::Local { .. } => ProjectKind::Local,
        }
    }

    pub fn local(build_info_file: impl Into<PathBuf>, file_list_file: impl Into<PathBuf>) -> Self {
        Connection::Local {
            build_info_file: build_info_file.into(),
            file_list_file: file_list_file.into(),
        }
    }

    /// Names of required fields that are present but empty
    pub fn blank_fields(&self) -> Vec<&'static str> {
        let mut blank = Vec::new();
        let mut check = |name: &'static str, value: &str| {
            if value.trim().is_empty() {
                blank.push(name);
            }
        };

        match self {
            Connection::Api {
                api_endpoint,
                token,
                project_key,
            } => {
                check("api_endpoint", api_endpoint);
                check("token", token);
                check("project_key", project_key);
            }
            Connection::Ftp {
                host,
                username,
                base_path,
                ..
            } => {
                check("host", host);
                check("username", username);
                check("base_path", base_path);
            }
            Connection::Local {
                build_info_file,
                file_list_file,
            } => {
                check("build_info_file", &build_info_file.to_string_lossy());
                check("file_list_file", &file_list_file.to_string_lossy());
            }
        }

        blank
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    pub connection: Connection,
}

impl ProjectConfig {
    pub fn new(project_id: impl Into<String>, connection: Connection) -> Self {
        let project_id = project_id.into();
        Self {
            project_name: project_id.clone(),
            project_id,
            connection,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn kind(&self) -> ProjectKind {
        self.connection.kind()
    }
}

/// Build filter handed to an adapter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum BuildFilter {
    /// Latest build, whatever its metadata
    #[default]
    None,
    CommitId(String),
    Version(String),
}

impl BuildFilter {
    pub fn commit_id(&self) -> Option<&str> {
        match self {
            BuildFilter::CommitId(c) => Some(c),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            BuildFilter::Version(v) => Some(v),
            _ => None,
        }
    }

    /// Whether a build's metadata satisfies this filter
    pub fn accepts(&self, commit_id: &str, version: &str) -> bool {
        match self {
            BuildFilter::None => true,
            BuildFilter::CommitId(c) => c == commit_id,
            BuildFilter::Version(v) => v == version,
        }
    }
}

impl fmt::Display for BuildFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildFilter::None => write!(f, "latest"),
            BuildFilter::CommitId(c) => write!(f, "commit_id={}", c),
            BuildFilter::Version(v) => write!(f, "version={}", v),
        }
    }
}

/// What an adapter is asked for: the newest build that passes the filter
/// and, when `require_success` is set, finished successfully
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BuildQuery {
    pub filter: BuildFilter,
    pub require_success: bool,
}

impl BuildQuery {
    /// Newest build of any status
    pub fn latest() -> Self {
        Self::default()
    }

    pub fn new(filter: BuildFilter) -> Self {
        Self {
            filter,
            require_success: false,
        }
    }

    pub fn successful(mut self) -> Self {
        self.require_success = true;
        self
    }

    pub fn accepts(&self, build: &BuildInfo) -> bool {
        (!self.require_success || build.is_success())
            && self.filter.accepts(&build.commit_id, &build.version)
    }
}

impl fmt::Display for BuildQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.require_success {
            write!(f, "{}, successful", self.filter)
        } else {
            write!(f, "{}", self.filter)
        }
    }
}
