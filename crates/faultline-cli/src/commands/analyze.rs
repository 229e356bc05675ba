//! The default `faultline` command: parse a log, investigate, propose a
//! fix, and -- unless `--no-apply` is set -- apply it after confirmation.

use std::io::Read;
use std::path::PathBuf;

use dialoguer::Confirm;
use faultline_core::config::FaultlineConfig;
use faultline_core::error::{FaultlineError, Result};
use faultline_core::types::Language;
use faultline_investigate::investigate;
use faultline_llm::GeminiClient;
use faultline_patch::{apply_patch_set, compute_diffs};

pub async fn run(log_file: Option<PathBuf>, root: PathBuf, language: Option<String>, no_apply: bool) -> Result<()> {
    let log = read_log(log_file.as_deref())?;
    if log.trim().is_empty() {
        return Err(FaultlineError::LogEmpty);
    }

    let hint = language.as_deref().and_then(Language::from_str_loose);
    let parsed = faultline_parsers::traceback::parse(&log, hint);
    if hint.is_none() && parsed.language == Language::Unknown && parsed.frames.is_empty() {
        tracing::warn!("language could not be detected from the log; continuing with traceback-less analysis");
    }

    let config = FaultlineConfig::from_env();
    let context = investigate(
        &root,
        &parsed.frames,
        parsed.language,
        parsed.error_message.as_deref(),
        &config.size_caps,
    );

    let prompt = faultline_llm::build_prompt(&log, &context);
    let client = GeminiClient::new(&config.llm);
    let proposal = client.generate_fix_proposal(&prompt).await?;

    let diffs = compute_diffs(&root, &proposal);
    for diff in &diffs {
        println!("{}", diff.diff_text);
    }
    println!("\n{}", proposal.explanation);

    if no_apply {
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt("Apply these changes?")
        .default(true)
        .interact()
        .unwrap_or(false);
    if !confirmed {
        println!("Not applied.");
        return Ok(());
    }

    let result = apply_patch_set(&root, &proposal, &config.size_caps);
    for file in &result.applied {
        println!("applied {}{}", file.filepath, if file.backed_up { " (backup saved)" } else { "" });
    }
    for (filepath, reason) in &result.failed {
        eprintln!("failed to apply {filepath}: {reason}");
    }

    Ok(())
}

fn read_log(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).map_err(FaultlineError::from),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
