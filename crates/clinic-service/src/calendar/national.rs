//! Fixed national holidays and the curated fallback list.

use chrono::NaiveDate;

use clinic_entity::holiday::{HolidayKind, UpsertHoliday, academic_year_label};

/// Provenance recorded for the fixed national holidays.
pub const NATIONAL_SOURCE: &str = "national_holidays";
/// Provenance recorded for the curated fallback entries.
pub const FALLBACK_SOURCE: &str = "curated_fallback";

/// (month, day, name). Months from September belong to the first
/// calendar year of the academic year, the rest to the second.
const NATIONAL: [(u32, u32, &str); 6] = [
    (10, 29, "Cumhuriyet Bayramı"),
    (1, 1, "Yılbaşı"),
    (4, 23, "Ulusal Egemenlik ve Çocuk Bayramı"),
    (5, 1, "Emek ve Dayanışma Günü"),
    (5, 19, "Atatürk'ü Anma, Gençlik ve Spor Bayramı"),
    (8, 30, "Zafer Bayramı"),
];

/// ((start month, day), (end month, day), name, kind), all in the
/// second calendar year of the academic year.
const FALLBACK: [((u32, u32), (u32, u32), &str, HolidayKind); 3] = [
    ((1, 26), (2, 6), "Yarıyıl Tatili", HolidayKind::SemesterBreak),
    ((6, 1), (6, 14), "Final Sınavları", HolidayKind::ExamPeriod),
    ((7, 1), (8, 31), "Yaz Tatili", HolidayKind::SemesterBreak),
];

fn calendar_year(academic_start: i32, month: u32) -> i32 {
    if month >= 9 {
        academic_start
    } else {
        academic_start + 1
    }
}

/// The six fixed-date national holidays of academic year `year`-`year+1`.
pub fn national_holidays(year: i32) -> Vec<UpsertHoliday> {
    let academic_year = academic_year_label(year);
    NATIONAL
        .iter()
        .filter_map(|&(month, day, name)| {
            let date = NaiveDate::from_ymd_opt(calendar_year(year, month), month, day)?;
            Some(UpsertHoliday {
                name: name.to_string(),
                start_date: date,
                end_date: date,
                holiday_type: HolidayKind::NationalHoliday,
                blocks_appointments: true,
                source: NATIONAL_SOURCE.to_string(),
                academic_year: academic_year.clone(),
            })
        })
        .collect()
}

/// Minimal academic entries used when no source yields anything.
pub fn fallback_academic(year: i32) -> Vec<UpsertHoliday> {
    let academic_year = academic_year_label(year);
    FALLBACK
        .iter()
        .filter_map(|&((sm, sd), (em, ed), name, kind)| {
            Some(UpsertHoliday {
                name: name.to_string(),
                start_date: NaiveDate::from_ymd_opt(year + 1, sm, sd)?,
                end_date: NaiveDate::from_ymd_opt(year + 1, em, ed)?,
                holiday_type: kind,
                blocks_appointments: kind.blocks_appointments_by_default(),
                source: FALLBACK_SOURCE.to_string(),
                academic_year: academic_year.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_national_holidays_in_academic_year() {
        let holidays = national_holidays(2025);
        assert_eq!(holidays.len(), 6);
        assert!(holidays.iter().all(|h| h.academic_year == "2025-2026"));
        assert!(holidays.iter().all(|h| h.blocks_appointments));

        let republic = holidays.iter().find(|h| h.name == "Cumhuriyet Bayramı").unwrap();
        assert_eq!(republic.start_date, NaiveDate::from_ymd_opt(2025, 10, 29).unwrap());
        let new_year = holidays.iter().find(|h| h.name == "Yılbaşı").unwrap();
        assert_eq!(new_year.start_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_fallback_entries_do_not_block() {
        let fallback = fallback_academic(2025);
        assert_eq!(fallback.len(), 3);
        assert!(fallback.iter().all(|h| !h.blocks_appointments));
        assert!(fallback.iter().all(|h| h.start_date <= h.end_date));
    }
}
