use clap::Parser;
use log::info;

use crate::common::FormInput;

/// What a run does before showing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Ask for every field on stdin.
    Prompt,
    /// Submit the fields given as flags, once.
    Flags,
    /// Only show or export history.
    HistoryOnly,
}

impl RunMode {
    pub fn submits(self) -> bool {
        self != RunMode::HistoryOnly
    }

    /// Whether a rejected or unsaved submission makes the process exit
    /// non-zero. Only flag mode, which submits exactly once.
    pub fn fails_on_rejected_submission(self) -> bool {
        self == RunMode::Flags
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArgs {
    #[arg(long, help = "Path to settings.json")]
    pub settings: Option<String>,

    #[arg(long = "base-url", help = "Landing page URL, e.g. https://www.example.com/")]
    pub base_url: Option<String>,

    #[arg(long, help = "utm_source, e.g. google, newsletter")]
    pub source: Option<String>,

    #[arg(long, help = "utm_medium, e.g. cpc, email")]
    pub medium: Option<String>,

    #[arg(long, help = "utm_campaign, e.g. black_friday")]
    pub campaign: Option<String>,

    #[arg(long, help = "Optional utm_term (keyword)")]
    pub term: Option<String>,

    #[arg(long, help = "Optional utm_content (ad variation)")]
    pub content: Option<String>,

    #[arg(long = "history-only", help = "Show the saved history without generating a link")]
    pub history_only: bool,

    #[arg(long = "no-history", help = "Don't print the history table")]
    pub no_history: bool,

    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "",
        help = "Export the full history as CSV (optionally to the given path)"
    )]
    pub export: Option<String>,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let args = CommandLineArgs::parse();

        info!(
            "Parsed {} form field(s) from the command line",
            args.form_field_count()
        );
        if args.history_only {
            info!("History-only mode enabled");
        }

        args
    }

    fn form_field_count(&self) -> usize {
        [
            &self.base_url,
            &self.source,
            &self.medium,
            &self.campaign,
            &self.term,
            &self.content,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }

    pub fn has_form_fields(&self) -> bool {
        self.form_field_count() > 0
    }

    /// Form flags win over `--export`; `--history-only` wins over both.
    /// Prompt only when nothing else was asked for.
    pub fn run_mode(&self) -> RunMode {
        if self.history_only {
            RunMode::HistoryOnly
        } else if self.has_form_fields() {
            RunMode::Flags
        } else if self.export.is_some() {
            RunMode::HistoryOnly
        } else {
            RunMode::Prompt
        }
    }

    pub fn to_form_input(&self) -> FormInput {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        FormInput {
            base_url: field(&self.base_url),
            source: field(&self.source),
            medium: field(&self.medium),
            campaign: field(&self.campaign),
            term: field(&self.term),
            content: field(&self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_args_default() {
        let args = CommandLineArgs::parse_from(["utm-builder"]);
        assert!(!args.has_form_fields());
        assert_eq!(args.run_mode(), RunMode::Prompt);
        assert_eq!(args.to_form_input(), FormInput::default());
    }

    #[test]
    fn test_command_line_args_with_data() {
        let args = CommandLineArgs::parse_from([
            "utm-builder",
            "--base-url",
            "https://example.com",
            "--source",
            "Google",
            "--campaign",
            "Black Friday",
        ]);

        assert!(args.has_form_fields());
        assert_eq!(args.run_mode(), RunMode::Flags);
        let input = args.to_form_input();
        assert_eq!(input.base_url, "https://example.com");
        assert_eq!(input.source, "Google");
        assert_eq!(input.medium, "");
        assert_eq!(input.campaign, "Black Friday");
    }

    #[test]
    fn test_export_flag_without_path() {
        let args = CommandLineArgs::parse_from(["utm-builder", "--export"]);
        assert_eq!(args.export.as_deref(), Some(""));

        let args = CommandLineArgs::parse_from(["utm-builder", "--export", "out.csv"]);
        assert_eq!(args.export.as_deref(), Some("out.csv"));
    }

    #[test]
    fn test_export_alone_submits_nothing() {
        for argv in [
            vec!["utm-builder", "--export"],
            vec!["utm-builder", "--export", "out.csv"],
            vec!["utm-builder", "--no-history", "--export", "out.csv"],
        ] {
            let mode = CommandLineArgs::parse_from(argv).run_mode();
            assert_eq!(mode, RunMode::HistoryOnly);
            assert!(!mode.submits());
        }
    }

    #[test]
    fn test_form_flags_with_export_still_submit() {
        let args = CommandLineArgs::parse_from([
            "utm-builder",
            "--source",
            "google",
            "--export",
            "out.csv",
        ]);
        assert_eq!(args.run_mode(), RunMode::Flags);
        assert!(args.run_mode().submits());
    }

    #[test]
    fn test_history_only_wins_over_form_flags() {
        let args =
            CommandLineArgs::parse_from(["utm-builder", "--history-only", "--source", "google"]);
        assert_eq!(args.run_mode(), RunMode::HistoryOnly);
    }

    #[test]
    fn test_only_flag_mode_fails_on_rejected_submission() {
        assert!(RunMode::Flags.fails_on_rejected_submission());
        assert!(!RunMode::Prompt.fails_on_rejected_submission());
        assert!(!RunMode::HistoryOnly.fails_on_rejected_submission());
    }
}
