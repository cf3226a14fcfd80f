use oscstamp::{CatalogDetails, CatalogResultVerbose};

mod ansi {
    /// Report roles, each mapped to one SGR sequence.
    #[derive(Debug, Clone, Copy)]
    pub enum Style {
        Title,
        Section,
        Label,
        Accepted,
        Warning,
        Rejected,
        Count,
        Timing,
    }

    impl Style {
        fn sgr(self) -> &'static str {
            match self {
                Style::Title => "1;36",
                Style::Section => "90",
                Style::Label => "2",
                Style::Accepted => "32",
                Style::Warning => "33",
                Style::Rejected => "31",
                Style::Count => "34",
                Style::Timing => "36",
            }
        }
    }

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, style: Style) -> String {
            if self.enabled { format!("\x1b[{}m{}\x1b[0m", style.sgr(), s.as_ref()) } else { s.as_ref().to_string() }
        }
    }
}

use ansi::Style;

/// Rejections listed before the rest are folded into a count.
const MAX_LISTED: usize = 20;

/// Print a run report on stderr; stdout carries the catalog.
pub fn print_run(res: &CatalogResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    let metrics = &details.metrics;

    eprintln!("\n{}", palette.paint(format!("⚙  Catalog: {} blocks", metrics.blocks), Style::Title));

    eprintln!("\n{}", palette.paint("━━━ Classification ━━━", Style::Section));
    eprintln!(
        "  {} {}  │  {} {}  │  {} {}",
        palette.paint("accepted:", Style::Label),
        palette.paint(res.accepted.to_string(), Style::Accepted),
        palette.paint("rejected:", Style::Label),
        palette.paint(res.rejected.to_string(), if res.rejected > 0 { Style::Warning } else { Style::Accepted }),
        palette.paint("generations:", Style::Label),
        palette.paint(metrics.generations.to_string(), Style::Count),
    );
    print_rejections(details, &palette);

    eprintln!("\n{}", palette.paint("━━━ Layout ━━━", Style::Section));
    match (details.periods.first(), details.periods.last()) {
        (Some(low), Some(high)) => eprintln!(
            "  {} {}  │  {} {}..{}  │  {} {}",
            palette.paint("periods:", Style::Label),
            palette.paint(details.periods.len().to_string(), Style::Count),
            palette.paint("range:", Style::Label),
            low,
            high,
            palette.paint("columns:", Style::Label),
            palette.paint(details.columns.to_string(), Style::Count),
        ),
        _ => eprintln!("{}", palette.paint("  Nothing to place", Style::Label)),
    }

    eprintln!("\n{}", palette.paint("━━━ Timing ━━━", Style::Section));
    eprintln!(
        "  Total: {}  │  Classify: {}  │  Layout: {}  │  Assemble: {}",
        palette.paint(format!("{:?}", metrics.total), Style::Accepted),
        palette.paint(format!("{:?}", metrics.classify), Style::Timing),
        palette.paint(format!("{:?}", metrics.layout), Style::Label),
        palette.paint(format!("{:?}", metrics.assemble), Style::Label),
    );
    eprintln!();
}

fn print_rejections(details: &CatalogDetails, palette: &ansi::Palette) {
    for rejection in details.rejections.iter().take(MAX_LISTED) {
        eprintln!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", rejection.index), Style::Label),
            palette.paint(rejection.reason.kind(), Style::Rejected),
            palette.paint("│", Style::Label),
            rejection.name.as_deref().unwrap_or("(unnamed)"),
        );
    }
    if details.rejections.len() > MAX_LISTED {
        eprintln!("  {}", palette.paint(format!("... +{} more", details.rejections.len() - MAX_LISTED), Style::Label));
    }

    for (index, warning) in &details.warnings {
        let label = palette.paint(format!("[{index}] warning:"), Style::Warning);
        eprintln!("  {label} {}", palette.paint(warning.to_string(), Style::Label));
    }
}
