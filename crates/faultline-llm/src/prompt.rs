//! Renders an [`InvestigationContext`] into the structured prompt sent to
//! the model: ERROR LOG, PROJECT DESCRIPTOR, CALL CHAIN, UPSTREAM CONTEXT,
//! then fixed INSTRUCTIONS. Each variable-length section gets its own
//! token budget so one enormous call chain can't crowd out the others.

use faultline_investigate::InvestigationContext;

use crate::token_budget::truncate_to_budget;

const LOG_BUDGET_TOKENS: usize = 2_000;
const CALL_CHAIN_BUDGET_TOKENS: usize = 6_000;
const UPSTREAM_BUDGET_TOKENS: usize = 3_000;

const INSTRUCTIONS: &str = r#"INSTRUCTIONS:
Respond with a single JSON object and nothing else. The object must have
these fields:
  "filepath": the file to change (or null if no single file applies)
  "full_code_block": the complete corrected contents of that file
  "explanation": a short explanation of the fix
  "root_cause_file": optional, the file where the underlying bug actually lives
  "root_cause_explanation": optional, explanation of the root cause
  "additional_fixes": optional array of objects with the same shape, for
    other files that also need changes
Do not wrap the JSON in a code fence. Do not include any text before or
after the JSON object."#;

/// Renders the full prompt for `log`, truncating the error log and the
/// two investigation sections independently.
pub fn build_prompt(log: &str, context: &InvestigationContext) -> String {
    let mut sections = Vec::new();

    let (log_section, log_truncated) = truncate_to_budget(log, LOG_BUDGET_TOKENS);
    sections.push(format!(
        "ERROR LOG:\n{log_section}{}",
        if log_truncated { "\n... (truncated)" } else { "" }
    ));

    if let Some(project) = &context.project {
        sections.push(render_project_descriptor(project));
    }

    if !context.call_chain.is_empty() {
        sections.push(render_call_chain(context));
    }

    if !context.upstream.is_empty() {
        sections.push(render_upstream(context));
    }

    if !context.candidate_files.is_empty() {
        sections.push(render_candidate_files(context));
    }

    sections.push(INSTRUCTIONS.to_string());
    sections.join("\n\n")
}

fn render_project_descriptor(project: &faultline_core::types::ProjectDescriptor) -> String {
    let mut out = format!("PROJECT DESCRIPTOR:\ntype: {}\n", project.project_type.as_str());
    if !project.frameworks.is_empty() {
        out.push_str(&format!("frameworks: {}\n", project.frameworks.join(", ")));
    }
    if !project.entry_points.is_empty() {
        let entries: Vec<String> = project.entry_points.iter().map(|p| p.display().to_string()).collect();
        out.push_str(&format!("entry points: {}\n", entries.join(", ")));
    }
    out.push_str(&format!("source files scanned: {}", project.source_files.len()));
    out
}

fn render_call_chain(context: &InvestigationContext) -> String {
    let mut lines = vec!["CALL CHAIN:".to_string()];
    for entry in &context.call_chain {
        let frame = &entry.frame;
        let location = match frame.column {
            Some(col) => format!("{}:{}:{}", frame.file, frame.line, col),
            None => format!("{}:{}", frame.file, frame.line),
        };
        lines.push(format!(
            "- {}{}",
            location,
            frame.symbol.as_deref().map(|s| format!(" in {s}")).unwrap_or_default()
        ));
        if let Some(symbol) = &entry.symbol {
            lines.push(format!(
                "  enclosing {:?} `{}` (lines {}-{}):",
                symbol.kind, symbol.name, symbol.start_line, symbol.end_line
            ));
            for line in symbol.source_text.lines() {
                lines.push(format!("  | {line}"));
            }
        }
        for import in &entry.imports {
            lines.push(format!(
                "  imports `{}` -> {}",
                import.import_text,
                import.resolved_target.as_deref().unwrap_or("(unresolved)")
            ));
        }
    }
    let (section, truncated) = truncate_to_budget(&lines.join("\n"), CALL_CHAIN_BUDGET_TOKENS);
    if truncated {
        format!("{section}\n... (truncated)")
    } else {
        section
    }
}

fn render_upstream(context: &InvestigationContext) -> String {
    let mut lines = vec!["UPSTREAM CONTEXT:".to_string()];
    for file in &context.upstream {
        lines.push(format!("--- {} ---", file.path));
        lines.push(file.excerpt.clone());
    }
    let (section, truncated) = truncate_to_budget(&lines.join("\n"), UPSTREAM_BUDGET_TOKENS);
    if truncated {
        format!("{section}\n... (truncated)")
    } else {
        section
    }
}

fn render_candidate_files(context: &InvestigationContext) -> String {
    let mut lines = vec!["CANDIDATE FILES:".to_string()];
    for candidate in &context.candidate_files {
        lines.push(format!(
            "- {} (score {:.1}, matched: {})",
            candidate.path.display(),
            candidate.score,
            candidate.matched_keywords.join(", ")
        ));
    }
    lines.join("\n")
}
