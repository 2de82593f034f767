//! Instructions sent to the model, one builder per step.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::schema::{ArchitectureAnalysis, Pitfall, ProjectSummary, SetupGuide};
use crate::ports::RepositoryInfo;
use crate::repo::{truncate_chars, FileExcerpt};
use crate::symbols::FileSymbols;

/// README characters included in a prompt.
const README_PROMPT_CHARS: usize = 4000;

fn repository_header(prompt: &mut String, info: &RepositoryInfo) {
    let _ = writeln!(prompt, "## Repository\n");
    let _ = writeln!(prompt, "Name: {}", info.full_name);
    if let Some(description) = &info.description {
        let _ = writeln!(prompt, "Description: {description}");
    }
    if let Some(language) = &info.language {
        let _ = writeln!(prompt, "Primary language: {language}");
    }
    if !info.topics.is_empty() {
        let _ = writeln!(prompt, "Topics: {}", info.topics.join(", "));
    }
    let _ = writeln!(prompt, "Stars: {}  Forks: {}\n", info.stars, info.forks);
}

fn language_breakdown(prompt: &mut String, languages: &BTreeMap<String, u64>) {
    if languages.is_empty() {
        return;
    }
    let total: u64 = languages.values().sum();
    let mut ranked: Vec<(&String, &u64)> = languages.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1));
    prompt.push_str("## Languages\n\n");
    for (name, bytes) in ranked {
        let share = if total == 0 { 0 } else { bytes * 100 / total };
        let _ = writeln!(prompt, "- {name}: {share}%");
    }
    prompt.push('\n');
}

fn summary_section(prompt: &mut String, summary: &ProjectSummary) {
    let _ = writeln!(prompt, "## Project Summary\n\n{}\n", summary.summary);
    if !summary.tech_stack.is_empty() {
        let _ = writeln!(prompt, "Tech stack: {}\n", summary.tech_stack.join(", "));
    }
}

fn excerpts_section(prompt: &mut String, title: &str, excerpts: &[FileExcerpt]) {
    if excerpts.is_empty() {
        return;
    }
    let _ = writeln!(prompt, "## {title}\n");
    for file in excerpts {
        let _ = writeln!(
            prompt,
            "### {} ({} bytes)\n```\n{}\n```\n",
            file.path, file.size, file.excerpt
        );
    }
}

/// Project summary from metadata and README.
#[must_use]
pub fn summary(info: &RepositoryInfo, readme: &str, languages: &BTreeMap<String, u64>) -> String {
    let mut prompt = String::from(
        "Summarize this software project for a developer who has never seen it.\n\n",
    );
    repository_header(&mut prompt, info);
    language_breakdown(&mut prompt, languages);
    if readme.trim().is_empty() {
        prompt.push_str("The repository has no README.\n\n");
    } else {
        let _ = writeln!(prompt, "## README\n\n{}\n", truncate_chars(readme, README_PROMPT_CHARS));
    }
    prompt.push_str(
        "## Instructions\n\n\
         - summary: two or three sentences on what the project is.\n\
         - purpose: the problem it solves.\n\
         - tech_stack: languages, frameworks and notable libraries.\n\
         - key_features: the headline capabilities.\n\
         - target_audience: who would use it.\n",
    );
    prompt
}

/// Architecture analysis from the selected file excerpts.
#[must_use]
pub fn architecture(
    info: &RepositoryInfo,
    summary: &ProjectSummary,
    excerpts: &[FileExcerpt],
    languages: &BTreeMap<String, u64>,
) -> String {
    let mut prompt = String::from("Describe the architecture of this codebase.\n\n");
    repository_header(&mut prompt, info);
    summary_section(&mut prompt, summary);
    language_breakdown(&mut prompt, languages);
    excerpts_section(&mut prompt, "Key Files (excerpts)", excerpts);
    prompt.push_str(
        "## Instructions\n\n\
         - pattern: the dominant architectural pattern, named briefly.\n\
         - description: one paragraph on how the code is organized.\n\
         - components: the major components, what each is responsible for, and which of the \
           files above implement it.\n\
         - data_flow: how a request or input moves through the components.\n\
         - entry_points: files where execution starts.\n",
    );
    prompt
}

/// Setup instructions from dependency manifests.
#[must_use]
pub fn setup(info: &RepositoryInfo, summary: &ProjectSummary, manifests: &[FileExcerpt]) -> String {
    let mut prompt = String::from("Work out how to install and run this project locally.\n\n");
    repository_header(&mut prompt, info);
    summary_section(&mut prompt, summary);
    if manifests.is_empty() {
        prompt.push_str("No dependency manifests were found at the repository root.\n\n");
    }
    excerpts_section(&mut prompt, "Dependency Manifests", manifests);
    prompt.push_str(
        "## Instructions\n\n\
         Only list commands that the manifests or summary support; do not invent scripts.\n\
         - prerequisites: tools and versions needed first.\n\
         - install_steps: ordered shell commands to install dependencies.\n\
         - run_commands: commands that start, build or test the project.\n\
         - environment_variables: variables the project expects.\n\
         - notes: anything else a newcomer must know.\n",
    );
    prompt
}

/// Pitfall detection over code and manifests.
#[must_use]
pub fn pitfalls(
    info: &RepositoryInfo,
    summary: &ProjectSummary,
    architecture: &ArchitectureAnalysis,
    excerpts: &[FileExcerpt],
    manifests: &[FileExcerpt],
) -> String {
    let mut prompt = String::from(
        "Review this project for pitfalls a new contributor is likely to hit: security \
         issues, outdated or risky dependencies, missing error handling, confusing structure.\n\n",
    );
    repository_header(&mut prompt, info);
    summary_section(&mut prompt, summary);
    let _ = writeln!(
        prompt,
        "## Architecture\n\n{}: {}\n",
        architecture.pattern, architecture.description
    );
    excerpts_section(&mut prompt, "Key Files (excerpts)", excerpts);
    excerpts_section(&mut prompt, "Dependency Manifests", manifests);
    prompt.push_str(
        "## Instructions\n\n\
         Return at most eight pitfalls, most important first. For each give a short title, \
         a severity (low, medium or high), a description, the affected file if there is one, \
         and a concrete recommendation.\n",
    );
    prompt
}

/// Symbol extraction for one window of one file.
#[must_use]
pub fn symbols(path: &str, window: &str) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "List the symbols declared in this fragment of `{path}`. The fragment may start or end \
         mid-declaration; skip declarations you cannot see the start of.\n"
    );
    let _ = writeln!(prompt, "```\n{window}\n```\n");
    prompt.push_str(
        "## Instructions\n\n\
         For each symbol give: file, symbol (its name), kind (function, class, variable, \
         interface, type or other), signature (the declaration line), description (one \
         sentence), dependencies (names it uses from elsewhere), and confidence (0 to 1).\n",
    );
    prompt
}

/// Final markdown documentation.
#[must_use]
pub fn wiki(
    info: &RepositoryInfo,
    summary: &ProjectSummary,
    architecture: &ArchitectureAnalysis,
    setup: &SetupGuide,
    pitfalls: &[Pitfall],
    symbols: &[FileSymbols],
) -> String {
    let mut prompt = String::from(
        "Write developer documentation for this repository in GitHub-flavored markdown. \
         Use the analysis below as your only source.\n\n",
    );
    repository_header(&mut prompt, info);
    summary_section(&mut prompt, summary);
    if !summary.key_features.is_empty() {
        let _ = writeln!(prompt, "Key features: {}\n", summary.key_features.join("; "));
    }

    let _ = writeln!(
        prompt,
        "## Architecture: {}\n\n{}\n",
        architecture.pattern, architecture.description
    );
    for component in &architecture.components {
        let _ = writeln!(
            prompt,
            "- {}: {} [{}]",
            component.name,
            component.responsibility,
            component.files.join(", ")
        );
    }
    if !architecture.data_flow.is_empty() {
        let _ = writeln!(prompt, "\nData flow: {}", architecture.data_flow);
    }
    prompt.push('\n');

    if !setup.is_empty() {
        prompt.push_str("## Setup\n\n");
        for step in setup.install_steps.iter().chain(&setup.run_commands) {
            let _ = writeln!(prompt, "- `{step}`");
        }
        prompt.push('\n');
    }

    if !pitfalls.is_empty() {
        prompt.push_str("## Pitfalls\n\n");
        for pitfall in pitfalls {
            let _ = writeln!(
                prompt,
                "- [{}] {}: {}",
                pitfall.severity.as_str(),
                pitfall.title,
                pitfall.description
            );
        }
        prompt.push('\n');
    }

    if !symbols.is_empty() {
        prompt.push_str("## Symbols\n\n");
        for file in symbols {
            let names: Vec<&str> = file.symbols.iter().map(|s| s.symbol.as_str()).collect();
            let _ = writeln!(prompt, "- {}: {}", file.file, names.join(", "));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "## Instructions\n\n\
         Produce sections: Overview, Architecture, Getting Started, Key Modules, Known Pitfalls. \
         Respond with the markdown document only.\n",
    );
    prompt
}

/// Simulated terminal output for running `command` in the repository.
#[must_use]
pub fn simulation(
    info: &RepositoryInfo,
    summary: &ProjectSummary,
    setup: &SetupGuide,
    command: &str,
) -> String {
    let mut prompt = String::from(
        "Simulate a terminal session. Show plausible output of running the command below in a \
         fresh clone of this repository, after its install steps have been run.\n\n",
    );
    repository_header(&mut prompt, info);
    summary_section(&mut prompt, summary);
    if !setup.install_steps.is_empty() {
        let _ =
            writeln!(prompt, "Install steps already run: {}\n", setup.install_steps.join(" && "));
    }
    let _ = writeln!(prompt, "## Command\n\n$ {command}\n");
    prompt.push_str("Respond with the terminal output only, no commentary and no code fences.\n");
    prompt
}
