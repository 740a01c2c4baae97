// src/client/catalog.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::ComposerError;
use crate::types::ExecutionMode;

/// Every composer subcommand the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    About,
    Archive,
    Browse,
    ClearCache,
    Config,
    CreateProject,
    Depends,
    Diagnose,
    DumpAutoload,
    Help,
    Home,
    Init,
    Install,
    Licenses,
    Prohibits,
    Require,
    Remove,
    RunScript,
    Search,
    SelfUpdate,
    Show,
    Status,
    Suggests,
    Update,
    Validate,
    Version,
    Why,
    WhyNot,
}

impl Operation {
    pub const ALL: [Operation; 28] = [
        Operation::About,
        Operation::Archive,
        Operation::Browse,
        Operation::ClearCache,
        Operation::Config,
        Operation::CreateProject,
        Operation::Depends,
        Operation::Diagnose,
        Operation::DumpAutoload,
        Operation::Help,
        Operation::Home,
        Operation::Init,
        Operation::Install,
        Operation::Licenses,
        Operation::Prohibits,
        Operation::Require,
        Operation::Remove,
        Operation::RunScript,
        Operation::Search,
        Operation::SelfUpdate,
        Operation::Show,
        Operation::Status,
        Operation::Suggests,
        Operation::Update,
        Operation::Validate,
        Operation::Version,
        Operation::Why,
        Operation::WhyNot,
    ];

    /// Name as typed by users and as used by composer itself.
    pub fn name(self) -> &'static str {
        match self {
            Operation::About => "about",
            Operation::Archive => "archive",
            Operation::Browse => "browse",
            Operation::ClearCache => "clear-cache",
            Operation::Config => "config",
            Operation::CreateProject => "create-project",
            Operation::Depends => "depends",
            Operation::Diagnose => "diagnose",
            Operation::DumpAutoload => "dump-autoload",
            Operation::Help => "help",
            Operation::Home => "home",
            Operation::Init => "init",
            Operation::Install => "install",
            Operation::Licenses => "licenses",
            Operation::Prohibits => "prohibits",
            Operation::Require => "require",
            Operation::Remove => "remove",
            Operation::RunScript => "run-script",
            Operation::Search => "search",
            Operation::SelfUpdate => "self-update",
            Operation::Show => "show",
            Operation::Status => "status",
            Operation::Suggests => "suggests",
            Operation::Update => "update",
            Operation::Validate => "validate",
            Operation::Version => "version",
            Operation::Why => "why",
            Operation::WhyNot => "why-not",
        }
    }

    /// Long-running, mutating work streams; quick informational work runs to
    /// completion.
    pub fn mode(self) -> ExecutionMode {
        match self {
            Operation::About
            | Operation::ClearCache
            | Operation::Help
            | Operation::Init
            | Operation::Licenses
            | Operation::SelfUpdate
            | Operation::Show
            | Operation::Status
            | Operation::Suggests
            | Operation::Version => ExecutionMode::Run,

            Operation::Archive
            | Operation::Diagnose
            | Operation::DumpAutoload
            | Operation::Install
            | Operation::Prohibits
            | Operation::Require
            | Operation::Remove
            | Operation::RunScript
            | Operation::Update
            | Operation::Validate => ExecutionMode::Stream,

            Operation::Browse
            | Operation::Config
            | Operation::CreateProject
            | Operation::Depends
            | Operation::Home
            | Operation::Search
            | Operation::Why
            | Operation::WhyNot => ExecutionMode::NotImplemented,
        }
    }

    /// Arguments placed before the caller's arguments.
    pub fn prefix(self) -> &'static [&'static str] {
        match self {
            // composer has no `version` subcommand.
            Operation::Version => &["--version"],
            Operation::About => &["about"],
            Operation::Archive => &["archive"],
            Operation::Browse => &["browse"],
            Operation::ClearCache => &["clear-cache"],
            Operation::Config => &["config"],
            Operation::CreateProject => &["create-project"],
            Operation::Depends => &["depends"],
            Operation::Diagnose => &["diagnose"],
            Operation::DumpAutoload => &["dump-autoload"],
            Operation::Help => &["help"],
            Operation::Home => &["home"],
            Operation::Init => &["init"],
            Operation::Install => &["install"],
            Operation::Licenses => &["licenses"],
            Operation::Prohibits => &["prohibits"],
            Operation::Require => &["require"],
            Operation::Remove => &["remove"],
            Operation::RunScript => &["run-script"],
            Operation::Search => &["search"],
            Operation::SelfUpdate => &["self-update"],
            Operation::Show => &["show"],
            Operation::Status => &["status"],
            Operation::Suggests => &["suggests"],
            Operation::Update => &["update"],
            Operation::Validate => &["validate"],
            Operation::Why => &["why"],
            Operation::WhyNot => &["why-not"],
        }
    }

    /// Whether the working directory must contain a project marker before
    /// this operation is dispatched.
    pub fn requires_project(self) -> bool {
        matches!(
            self,
            Operation::Archive
                | Operation::Install
                | Operation::Remove
                | Operation::Require
                | Operation::RunScript
                | Operation::Status
                | Operation::Update
                | Operation::Validate
        )
    }

    /// Whether the operation does anything useful without user arguments.
    pub fn requires_args(self) -> bool {
        matches!(
            self,
            Operation::Remove | Operation::Require | Operation::RunScript | Operation::Help
        )
    }

    /// Prefix followed by the caller's arguments, before rewriting.
    pub fn command_line(self, args: &[String]) -> Vec<String> {
        self.prefix()
            .iter()
            .map(|s| s.to_string())
            .chain(args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ComposerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == wanted)
            .ok_or(ComposerError::UnknownOperation(wanted))
    }
}
