//! Markdown rendering of a report for the terminal.

use std::fmt::Write;

use super::model::CachedReport;

/// Renders the whole report as markdown.
#[must_use]
pub fn render_markdown(report: &CachedReport) -> String {
    let mut out = String::new();
    let info = &report.repo_info;

    let _ = writeln!(out, "# {}\n", info.full_name);
    if let Some(description) = &info.description {
        let _ = writeln!(out, "> {description}\n");
    }
    let _ = writeln!(
        out,
        "Stars: {} | Forks: {} | Open issues: {} | License: {}",
        info.stars,
        info.forks,
        info.open_issues,
        info.license.as_deref().unwrap_or("none")
    );
    if !report.languages.is_empty() {
        let langs: Vec<&str> = report.languages.keys().map(String::as_str).collect();
        let _ = writeln!(out, "Languages: {}", langs.join(", "));
    }
    let _ = writeln!(out, "Generated: {} (run {})\n", report.timestamp.to_rfc3339(), report.run_id);

    let summary = &report.analysis.summary;
    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "{}\n", summary.summary);
    if !summary.purpose.is_empty() {
        let _ = writeln!(out, "**Purpose:** {}\n", summary.purpose);
    }
    if !summary.tech_stack.is_empty() {
        let _ = writeln!(out, "**Tech stack:** {}\n", summary.tech_stack.join(", "));
    }
    bullet_list(&mut out, "Key features", &summary.key_features);

    let arch = &report.analysis.architecture;
    let _ = writeln!(out, "## Architecture: {}\n", arch.pattern);
    if !arch.description.is_empty() {
        let _ = writeln!(out, "{}\n", arch.description);
    }
    for component in &arch.components {
        let _ = write!(out, "- **{}**: {}", component.name, component.responsibility);
        if !component.files.is_empty() {
            let _ = write!(out, " (`{}`)", component.files.join("`, `"));
        }
        out.push('\n');
    }
    if !arch.components.is_empty() {
        out.push('\n');
    }
    bullet_list(&mut out, "Entry points", &arch.entry_points);

    if !report.setup.is_empty() {
        out.push_str("## Setup\n\n");
        bullet_list(&mut out, "Prerequisites", &report.setup.prerequisites);
        code_list(&mut out, "Install", &report.setup.install_steps);
        code_list(&mut out, "Run", &report.setup.run_commands);
        bullet_list(&mut out, "Environment", &report.setup.environment_variables);
        bullet_list(&mut out, "Notes", &report.setup.notes);
    }

    if !report.pitfalls.is_empty() {
        out.push_str("## Pitfalls\n\n");
        for pitfall in &report.pitfalls {
            let _ = write!(out, "- **[{}] {}**", pitfall.severity.as_str(), pitfall.title);
            if let Some(location) = &pitfall.location {
                let _ = write!(out, " in `{location}`");
            }
            let _ = writeln!(out, ": {}", pitfall.description);
            if !pitfall.recommendation.is_empty() {
                let _ = writeln!(out, "  - Fix: {}", pitfall.recommendation);
            }
        }
        out.push('\n');
    }

    if !report.static_analysis.is_empty() {
        out.push_str("## Symbols\n\n");
        for file in &report.static_analysis {
            let _ = writeln!(out, "### `{}`\n", file.file);
            if file.symbols.is_empty() {
                out.push_str("_No symbols found._\n\n");
                continue;
            }
            out.push_str("| Symbol | Kind | Description |\n|---|---|---|\n");
            for symbol in &file.symbols {
                let _ = writeln!(
                    out,
                    "| `{}` | {} | {} |",
                    symbol.symbol,
                    symbol.kind.as_str(),
                    symbol.description.replace('|', "\\|")
                );
            }
            out.push('\n');
        }
    }

    if !report.dependency_files.is_empty() {
        out.push_str("## Dependency manifests\n\n");
        for manifest in &report.dependency_files {
            let _ = writeln!(out, "- `{}` ({} bytes)", manifest.path, manifest.size);
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
    out.push_str(report.wiki_markdown.trim_end());
    out.push('\n');
    out
}

fn bullet_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "**{title}:**\n");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}

fn code_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "**{title}:**\n\n```sh");
    for item in items {
        let _ = writeln!(out, "{item}");
    }
    out.push_str("```\n\n");
}
