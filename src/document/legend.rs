//! Catalog legend: title, credits and the explanatory header text.

use chrono::NaiveDate;

const DEFAULT_BODY: &str = "\
#C
#C Most lines of this header describe particular oscillators.  Each entry
#C begins with an identifying label, of the form \"period.row.column\";
#C row and column numbers start at zero.  This is followed by the name of
#C the oscillator (if any), the discoverer and date of discovery (if known)
#C in brackets, and perhaps a comment about the oscillator.  For example:
#C
#C     2.0.0 blinker [JHC 3/70]
#C           Example of \"+c*c\" symmetry.
#C
#C This indicates that the leftmost oscillator in the top row of the period 2
#C section is called a \"blinker\", and was found by John Conway in March 1970.
#C
#C Periods are separated by a row of blocks, and each period section starts
#C with its period written in still-life digits.  Every oscillator is given
#C enough room that the whole collection can be run without interactions.
#C";

/// Opaque legend data placed at the top of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    pub title: String,
    pub credits: String,
    /// Emitted verbatim; lines that are not already comments get `#C `.
    pub body: String,
}

impl Default for Legend {
    fn default() -> Self {
        Legend {
            title: "Oscillator stamp collection".to_string(),
            credits: "Dean Hickerson, David Raucci, et al.".to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

impl Legend {
    /// Default title and credits with a custom body.
    pub fn with_body(body: impl Into<String>) -> Self {
        Legend { body: body.into(), ..Legend::default() }
    }

    /// Header lines: title, credits with the date, `summary`, then the body.
    pub(crate) fn lines(&self, date: NaiveDate, summary: &str) -> Vec<String> {
        let mut lines = vec![
            format!("#N {}", self.title),
            format!("#O {}, updated {}", self.credits, date.format("%b %d, %Y")),
            format!("#C {summary}"),
        ];
        for line in self.body.lines() {
            let line = line.trim_end();
            if line.starts_with('#') {
                lines.push(line.to_string());
            } else if line.is_empty() {
                lines.push("#C".to_string());
            } else {
                lines.push(format!("#C {line}"));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lines_carry_date_and_summary() {
        let date = NaiveDate::from_ymd_opt(2023, 8, 4).unwrap();
        let lines = Legend::with_body("plain text\n\n#C already a comment").lines(date, "3 oscillators.");
        assert_eq!(
            lines,
            vec![
                "#N Oscillator stamp collection",
                "#O Dean Hickerson, David Raucci, et al., updated Aug 04, 2023",
                "#C 3 oscillators.",
                "#C plain text",
                "#C",
                "#C already a comment",
            ]
        );
    }

    #[test]
    fn default_body_is_all_comments() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(Legend::default().lines(date, "x").iter().all(|l| l.starts_with('#')));
    }
}
