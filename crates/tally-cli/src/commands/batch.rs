//! Batch command: one prompt per line

use crate::console::CliConsole;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tally_core::{ChatMessage, ChatOverrides, ClientConfig, LlmGateway};

/// Run every non-empty line of `file` through the gateway.
///
/// Answers are printed in input order, one per line. Failed items are
/// reported on stderr with their line number and make the command fail.
pub async fn run(config: ClientConfig, file: &Path, overrides: ChatOverrides) -> Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read prompts from {}", file.display()))?;

    let prompts = parse_prompts(&contents);
    if prompts.is_empty() {
        CliConsole::warn(&format!("No prompts found in {}", file.display()));
        return Ok(());
    }

    let gateway = LlmGateway::new(config)?;
    let conversations: Vec<Vec<ChatMessage>> = prompts
        .iter()
        .map(|(_, prompt)| vec![ChatMessage::user(*prompt)])
        .collect();

    let results = gateway.chat_batch(&conversations, Some(&overrides)).await;

    let mut failures = 0;
    for ((line, _), result) in prompts.iter().zip(results) {
        match result {
            Ok(answer) => println!("{}", answer),
            Err(e) => {
                failures += 1;
                println!();
                CliConsole::error(&format!("line {}: {}", line, e));
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} prompts failed", failures, prompts.len());
    }
    CliConsole::success(&format!("{} prompts answered", prompts.len()));
    Ok(())
}

/// Non-empty lines with their 1-based line numbers
fn parse_prompts(contents: &str) -> Vec<(usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_keeps_numbers() {
        let prompts = parse_prompts("COFFEE\n\n  RENT  \n\t\nGROCERIES");
        assert_eq!(prompts, vec![(1, "COFFEE"), (3, "RENT"), (5, "GROCERIES")]);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let result = run(
            ClientConfig::new("k"),
            &missing,
            ChatOverrides::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn empty_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.txt");
        std::fs::write(&path, "\n   \n").unwrap();

        assert!(run(ClientConfig::new("k"), &path, ChatOverrides::default()).await.is_ok());
    }
}
