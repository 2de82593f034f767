//! `reposcope files` command.

use std::fmt::Write as _;

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::pipeline::rank_files;
use crate::repo::{RepoId, ScoredFile};

/// Execute the `files` command.
///
/// # Errors
///
/// Returns an error string if `repo` is invalid or the tree cannot be listed.
pub async fn run(ctx: &ServiceContext, settings: &Settings, repo: &str) -> Result<(), String> {
    let id = RepoId::parse(repo).map_err(|e| e.to_string())?;
    let ranked = rank_files(ctx, settings, &id).await.map_err(|e| e.to_string())?;
    if ranked.is_empty() {
        println!("No eligible files in {id}.");
        return Ok(());
    }
    print!("{}", format_table(&ranked));
    Ok(())
}

fn format_table(ranked: &[ScoredFile]) -> String {
    let size_width = ranked.iter().map(|s| s.file.size.to_string().len()).max().unwrap_or(4).max(4);

    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:>size_width$}  PATH", "SCORE", "SIZE");
    for scored in ranked {
        let _ = writeln!(
            out,
            "{:>5}  {:>size_width$}  {}",
            scored.score, scored.file.size, scored.file.path
        );
    }
    let _ = writeln!(out, "\n{} file(s) selected.", ranked.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CandidateFile;

    #[test]
    fn table_aligns_columns() {
        let ranked = vec![
            ScoredFile { file: CandidateFile::blob("src/main.rs", 12345), score: 17 },
            ScoredFile { file: CandidateFile::blob("README.md", 80), score: 2 },
        ];
        let table = format_table(&ranked);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "SCORE   SIZE  PATH");
        assert_eq!(lines[1], "   17  12345  src/main.rs");
        assert_eq!(lines[2], "    2     80  README.md");
        assert!(table.ends_with("2 file(s) selected.\n"));
    }
}
