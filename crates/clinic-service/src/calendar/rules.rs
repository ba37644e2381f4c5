//! Regex rule engine for academic calendar text.
//!
//! Each rule pairs a pattern with a kind hint and an extractor that turns
//! its captures into a date range. Every pattern marks the date part of
//! the match with a `dates` group; whatever is left of the line becomes
//! the entry name. Turkish and English calendars are both handled.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use clinic_entity::holiday::HolidayKind;

/// A dated entry found in calendar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Entry name, taken from the rest of the line.
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Kind suggested by the rule that matched.
    pub hint: Option<HolidayKind>,
    /// Name of the rule that matched.
    pub rule: &'static str,
    /// The full source line, used for classification.
    pub line: String,
}

type Extractor = fn(&Captures<'_>, i32) -> Option<(NaiveDate, NaiveDate)>;

struct Rule {
    name: &'static str,
    regex: Regex,
    hint: Option<HolidayKind>,
    extract: Extractor,
}

const MONTHS: &str = "ocak|şubat|subat|mart|nisan|mayıs|mayis|haziran|temmuz|ağustos|agustos|\
eylül|eylul|ekim|kasım|kasim|aralık|aralik|january|february|march|april|may|june|july|august|\
september|october|november|december";

const EN_MONTHS: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

const NUMERIC_RANGE: &str = r"(?P<dates>(?P<sd>\d{1,2})[./](?P<sm>\d{1,2})[./](?P<sy>\d{4})\s*[-–]\s*(?P<ed>\d{1,2})[./](?P<em>\d{1,2})[./](?P<ey>\d{4}))";

fn build(pattern: &str) -> Regex {
    Regex::new(pattern).expect("calendar rule pattern is valid")
}

/// Rules in priority order. Phrase rules run first so their date spans
/// are claimed before the generic month-name rules look at the line.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule {
            name: "semester_break_phrase",
            regex: build(&format!(
                r"(?i)\b(?:yarıyıl\s+tatili|yariyil\s+tatili|ara\s+tatil|semester\s+break|mid-?year\s+break)[^\d\n]*?{NUMERIC_RANGE}"
            )),
            hint: Some(HolidayKind::SemesterBreak),
            extract: numeric_range,
        },
        Rule {
            name: "exam_period_phrase",
            regex: build(&format!(
                r"(?i)\b(?:final\s+sınavları|final\s+sinavlari|ara\s+sınavlar?ı?|ara\s+sinavlari|vize\s+sınavları|vize|bütünleme|final\s+exams?|midterm\s+exams?|midterms?)[^\d\n]*?{NUMERIC_RANGE}"
            )),
            hint: Some(HolidayKind::ExamPeriod),
            extract: numeric_range,
        },
        Rule {
            name: "cross_month_day_month",
            regex: build(&format!(
                r"(?i)\b(?P<dates>(?P<d1>\d{{1,2}})\s+(?P<m1>{MONTHS})(?:\s+(?P<y1>\d{{4}}))?\s*[-–]\s*(?P<d2>\d{{1,2}})\s+(?P<m2>{MONTHS})\b(?:\s+(?P<y2>\d{{4}}))?)"
            )),
            hint: None,
            extract: cross_month_range,
        },
        Rule {
            name: "cross_month_month_day",
            regex: build(&format!(
                r"(?i)\b(?P<dates>(?P<m1>{EN_MONTHS})\s+(?P<d1>\d{{1,2}})(?:,?\s+(?P<y1>\d{{4}}))?\s*[-–]\s*(?P<m2>{EN_MONTHS})\s+(?P<d2>\d{{1,2}})(?:,?\s+(?P<y2>\d{{4}}))?)\b"
            )),
            hint: None,
            extract: cross_month_range,
        },
        Rule {
            name: "day_month_name",
            regex: build(&format!(
                r"(?i)\b(?P<dates>(?P<d1>\d{{1,2}})(?:\s*[-–]\s*(?P<d2>\d{{1,2}}))?\s+(?P<month>{MONTHS})\b(?:\s+(?P<year>\d{{4}}))?)"
            )),
            hint: None,
            extract: month_name_range,
        },
        Rule {
            name: "month_name_day",
            regex: build(&format!(
                r"(?i)\b(?P<dates>(?P<month>{EN_MONTHS})\s+(?P<d1>\d{{1,2}})(?:\s*[-–]\s*(?P<d2>\d{{1,2}}))?(?:,?\s+(?P<year>\d{{4}}))?)\b"
            )),
            hint: None,
            extract: month_name_range,
        },
    ]
});

/// Month number from a Turkish or English month name.
fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let month = match prefix.as_str() {
        "oca" | "jan" => 1,
        "şub" | "sub" | "feb" => 2,
        "mar" => 3,
        "nis" | "apr" => 4,
        "may" => 5,
        "haz" | "jun" => 6,
        "tem" | "jul" => 7,
        "ağu" | "agu" | "aug" => 8,
        "eyl" | "sep" => 9,
        "eki" | "oct" => 10,
        "kas" | "nov" => 11,
        "ara" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn number(caps: &Captures<'_>, group: &str) -> Option<u32> {
    caps.name(group)?.as_str().parse().ok()
}

/// Calendar year of `month` in the academic year starting in `year`.
fn infer_year(year: i32, month: u32) -> i32 {
    if month >= 9 { year } else { year + 1 }
}

fn month_name_range(caps: &Captures<'_>, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let month = month_number(caps.name("month")?.as_str())?;
    let first = number(caps, "d1")?;
    let last = number(caps, "d2").unwrap_or(first);
    let y = caps
        .name("year")
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_else(|| infer_year(year, month));
    Some((
        NaiveDate::from_ymd_opt(y, month, first)?,
        NaiveDate::from_ymd_opt(y, month, last)?,
    ))
}

/// A range whose ends fall in different months. A year given on only one
/// end carries to the other, stepping across December when needed.
fn cross_month_range(caps: &Captures<'_>, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let m1 = month_number(caps.name("m1")?.as_str())?;
    let m2 = month_number(caps.name("m2")?.as_str())?;
    let explicit = |group: &str| caps.name(group).and_then(|m| m.as_str().parse::<i32>().ok());
    let (y1, y2) = match (explicit("y1"), explicit("y2")) {
        (Some(y1), Some(y2)) => (y1, y2),
        (Some(y1), None) => (y1, if m2 < m1 { y1 + 1 } else { y1 }),
        (None, Some(y2)) => (if m1 > m2 { y2 - 1 } else { y2 }, y2),
        (None, None) => (infer_year(year, m1), infer_year(year, m2)),
    };
    Some((
        NaiveDate::from_ymd_opt(y1, m1, number(caps, "d1")?)?,
        NaiveDate::from_ymd_opt(y2, m2, number(caps, "d2")?)?,
    ))
}

fn numeric_range(caps: &Captures<'_>, _year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let date = |d: &str, m: &str, y: &str| {
        NaiveDate::from_ymd_opt(number(caps, y)? as i32, number(caps, m)?, number(caps, d)?)
    };
    Some((date("sd", "sm", "sy")?, date("ed", "em", "ey")?))
}

/// Loose sanity window around the requested academic year.
fn within_window(year: i32, date: NaiveDate) -> bool {
    (year - 1..=year + 1).contains(&date.year())
}

/// The line with the date span removed, trimmed of separators.
fn entry_name(line: &str, dates: Range<usize>) -> String {
    let rest = format!("{} {}", &line[..dates.start], &line[dates.end..]);
    rest.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_whitespace() || ":-–—,.;|()".contains(c))
        .to_string()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Run every rule over `text` for the academic year starting in `year`.
///
/// Entries outside `[year - 1, year + 1]` or with an inverted range are
/// dropped. The first entry wins when two share a name.
pub fn extract(text: &str, year: i32) -> Vec<ExtractedEntry> {
    let mut entries: Vec<ExtractedEntry> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut claimed: Vec<Range<usize>> = Vec::new();

        for rule in RULES.iter() {
            for caps in rule.regex.captures_iter(line) {
                let Some(dates) = caps.name("dates") else {
                    continue;
                };
                let span = dates.range();
                if claimed.iter().any(|c| overlaps(c, &span)) {
                    continue;
                }
                let Some((start, end)) = (rule.extract)(&caps, year) else {
                    continue;
                };
                if end < start || !within_window(year, start) || !within_window(year, end) {
                    continue;
                }
                claimed.push(span.clone());

                let mut name = entry_name(line, span);
                if name.is_empty() {
                    name = format!("Academic calendar entry {start}");
                }
                if entries.iter().any(|e| e.name == name) {
                    continue;
                }

                entries.push(ExtractedEntry {
                    name,
                    start_date: start,
                    end_date: end,
                    hint: rule.hint,
                    rule: rule.name,
                    line: line.to_string(),
                });
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn find<'a>(entries: &'a [ExtractedEntry], name: &str) -> &'a ExtractedEntry {
        entries
            .iter()
            .find(|e| e.name == name)
            .unwrap_or_else(|| panic!("missing {name}: {entries:#?}"))
    }

    const TURKISH: &str = "\
2025-2026 Eğitim-Öğretim Yılı Akademik Takvimi
29 Ekim 2025 Cumhuriyet Bayramı
Güz Yarıyılı Final Sınavları: 05.01.2026 - 16.01.2026
Yarıyıl Tatili 26.01.2026 - 06.02.2026
19-22 Mart 2026 Ramazan Bayramı
26-30 Mayıs Kurban Bayramı
";

    const ENGLISH: &str = "\
Academic Calendar 2025-2026
October 29, 2025 Republic Day holiday
Final exams 12.01.2026 – 23.01.2026
Semester break: 26/01/2026 - 06/02/2026
1 May 2026 Labour Day
";

    #[test]
    fn test_turkish_fixture() {
        let entries = extract(TURKISH, 2025);
        assert_eq!(entries.len(), 5, "{entries:#?}");

        let republic = find(&entries, "Cumhuriyet Bayramı");
        assert_eq!((republic.start_date, republic.end_date), (d(2025, 10, 29), d(2025, 10, 29)));
        assert_eq!(republic.rule, "day_month_name");

        let finals = find(&entries, "Güz Yarıyılı Final Sınavları");
        assert_eq!((finals.start_date, finals.end_date), (d(2026, 1, 5), d(2026, 1, 16)));
        assert_eq!(finals.hint, Some(HolidayKind::ExamPeriod));

        let semester = find(&entries, "Yarıyıl Tatili");
        assert_eq!(semester.hint, Some(HolidayKind::SemesterBreak));
        assert_eq!(semester.end_date, d(2026, 2, 6));

        let ramazan = find(&entries, "Ramazan Bayramı");
        assert_eq!((ramazan.start_date, ramazan.end_date), (d(2026, 3, 19), d(2026, 3, 22)));
    }

    #[test]
    fn test_missing_year_follows_academic_year() {
        let entries = extract(TURKISH, 2025);
        let kurban = find(&entries, "Kurban Bayramı");
        assert_eq!((kurban.start_date, kurban.end_date), (d(2026, 5, 26), d(2026, 5, 30)));

        let autumn = extract("15 Kasım Mezuniyet Töreni", 2025);
        assert_eq!(autumn[0].start_date, d(2025, 11, 15));
    }

    #[test]
    fn test_english_fixture() {
        let entries = extract(ENGLISH, 2025);
        assert_eq!(entries.len(), 4, "{entries:#?}");

        let republic = find(&entries, "Republic Day holiday");
        assert_eq!(republic.start_date, d(2025, 10, 29));
        assert_eq!(republic.rule, "month_name_day");

        let exams = find(&entries, "Final exams");
        assert_eq!((exams.start_date, exams.end_date), (d(2026, 1, 12), d(2026, 1, 23)));

        let semester = find(&entries, "Semester break");
        assert_eq!(semester.start_date, d(2026, 1, 26));

        let labour = find(&entries, "Labour Day");
        assert_eq!(labour.start_date, d(2026, 5, 1));
    }

    #[test]
    fn test_cross_month_range_is_one_entry() {
        let turkish = extract("Yarıyıl Tatili 26 Ocak - 6 Şubat 2026", 2025);
        assert_eq!(turkish.len(), 1, "{turkish:#?}");
        assert_eq!(turkish[0].name, "Yarıyıl Tatili");
        assert_eq!(turkish[0].rule, "cross_month_day_month");
        assert_eq!((turkish[0].start_date, turkish[0].end_date), (d(2026, 1, 26), d(2026, 2, 6)));

        let english = extract("Winter break January 26 - February 6, 2026", 2025);
        assert_eq!(english.len(), 1, "{english:#?}");
        assert_eq!(english[0].name, "Winter break");
        assert_eq!(english[0].rule, "cross_month_month_day");
        assert_eq!((english[0].start_date, english[0].end_date), (d(2026, 1, 26), d(2026, 2, 6)));
    }

    #[test]
    fn test_cross_month_range_spans_new_year() {
        let explicit = extract("Kış Tatili 22 Aralık 2025 - 2 Ocak 2026", 2025);
        assert_eq!((explicit[0].start_date, explicit[0].end_date), (d(2025, 12, 22), d(2026, 1, 2)));

        let trailing_year = extract("Kış Tatili 22 Aralık - 2 Ocak 2026", 2025);
        assert_eq!(trailing_year[0].start_date, d(2025, 12, 22));

        let no_year = extract("Holiday recess December 22 - January 2", 2025);
        assert_eq!(no_year.len(), 1, "{no_year:#?}");
        assert_eq!(no_year[0].name, "Holiday recess");
        assert_eq!((no_year[0].start_date, no_year[0].end_date), (d(2025, 12, 22), d(2026, 1, 2)));
    }

    #[test]
    fn test_out_of_window_years_dropped() {
        assert!(extract("29 Ekim 2031 Cumhuriyet Bayramı", 2025).is_empty());
        assert!(extract("Final exams 12.01.2019 - 23.01.2019", 2025).is_empty());
        assert_eq!(extract("29 Ekim 2024 Cumhuriyet Bayramı", 2025).len(), 1);
    }

    #[test]
    fn test_invalid_and_inverted_dates_dropped() {
        assert!(extract("31 Şubat 2026 Geçersiz", 2025).is_empty());
        assert!(extract("Final exams 23.01.2026 - 12.01.2026", 2025).is_empty());
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(month_number("Şubat"), Some(2));
        assert_eq!(month_number("AĞUSTOS"), Some(8));
        assert_eq!(month_number("Kasım"), Some(11));
        assert_eq!(month_number("December"), Some(12));
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn test_line_without_dates() {
        assert!(extract("Bahar Yarıyılı Derslerinin Başlaması", 2025).is_empty());
    }
}
