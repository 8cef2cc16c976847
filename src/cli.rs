use clap::Parser;

/// CLI arguments parser using `clap`
///
/// All positionals are optional at the clap layer; the settings resolver
/// enforces which are required so missing arguments surface through the
/// application's own error taxonomy.
#[derive(Parser, Debug)]
#[command(
    about = "Automates branch, tag and merge-request workflows across a set of Git checkouts",
    version
)]
pub struct Cli {
    /// Workflow to run: new-task, new-tag or new-merge-request
    pub command: Option<String>,
    /// Comma-separated list of configured project ids, executed in order
    pub project_ids: Option<String>,
    /// Branch name (new-task and new-merge-request)
    pub branch: Option<String>,
    /// Merge request title (new-merge-request)
    pub title: Option<String>,
}
