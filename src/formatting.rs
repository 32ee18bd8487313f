use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::chat::session::{Role, Session};
use crate::knowledge::types::{IngestReport, SourceKind, SourceRecord};

pub fn format_ingest_report(report: &IngestReport) -> String {
    let record = &report.record;
    let what = match record.kind {
        SourceKind::Document => "Document",
        SourceKind::PlainText => "Text file",
        SourceKind::WebPage => "Web page",
        SourceKind::VideoTranscript => "Video transcript",
    };

    let mut output = format!(
        "{} {} processed: {} ({} tokens, knowledge base now {} tokens)",
        "✔".green().bold(),
        what,
        record.label,
        record.tokens,
        report.knowledge_tokens
    );

    if record.summarized {
        output.push('\n');
        output.push_str(
            &"The content was summarized to save space."
                .cyan()
                .to_string(),
        );
    }

    if report.tokens_discarded > 0 {
        output.push('\n');
        output.push_str(
            &format!(
                "Knowledge base limit reached: the oldest {} tokens were dropped.",
                report.tokens_discarded
            )
            .yellow()
            .to_string(),
        );
    }

    output
}

pub fn format_error(context: &str, error: &dyn std::fmt::Display) -> String {
    format!("{} {}: {}", "✘".red().bold(), context, error)
}

pub fn format_knowledge_stats(session: &Session) -> String {
    let kb = session.knowledge_base();
    let mut output = String::new();

    output.push_str(&"Knowledge Base".bold().to_string());
    output.push('\n');
    output.push_str(&format!(
        "Tokens: {} / {}",
        kb.token_count(),
        kb.budget().max_tokens()
    ));
    output.push('\n');
    output.push_str(&format!("Sources: {}", session.sources().len()));
    output.push('\n');
    output.push_str(&format!("Turns: {}", session.messages().len()));
    output.push('\n');

    output
}

pub fn format_source_list(sources: &[SourceRecord]) -> String {
    if sources.is_empty() {
        return "No sources ingested".to_string();
    }

    let mut output = String::new();

    output.push_str(
        &format!(
            "{:<8} {:<62} {:<8} {:<11} {}\n",
            "Kind", "Source", "Tokens", "Summarized", "Added"
        )
        .bold()
        .to_string(),
    );
    output.push_str(&"─".repeat(100));
    output.push('\n');

    for record in sources {
        let label = if record.label.chars().count() > 60 {
            format!("{}...", truncate_chars(&record.label, 57))
        } else {
            record.label.clone()
        };

        output.push_str(&format!(
            "{:<8} {:<62} {:<8} {:<11} {}\n",
            record.kind.to_string(),
            label,
            record.tokens,
            if record.summarized { "yes" } else { "no" },
            format_relative_time(record.ingested_at)
        ));
    }

    output
}

/// Render the conversation the way it is shown after each turn
pub fn format_history(session: &Session) -> String {
    if session.messages().is_empty() {
        return "No messages yet".to_string();
    }

    let mut output = String::new();
    for turn in session.messages() {
        let label = match turn.role {
            Role::User => "you".blue().bold(),
            Role::Assistant => "assistant".magenta().bold(),
        };
        output.push_str(&label.to_string());
        output.push('\n');
        output.push_str(&turn.content);
        output.push_str("\n\n");
    }
    output
}

fn format_relative_time(dt: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{} days ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{} hours ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{} minutes ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
