//! Keyword classification of calendar lines.

use clinic_entity::holiday::HolidayKind;

/// Keyword groups, checked in order. The first group with a hit wins.
const KEYWORDS: &[(HolidayKind, &[&str])] = &[
    (
        HolidayKind::ExamPeriod,
        &["sınav", "sinav", "vize", "final", "bütünleme", "exam", "midterm"],
    ),
    (
        HolidayKind::ReligiousHoliday,
        &["kurban", "ramazan", "arife", "religious", "eid"],
    ),
    (
        HolidayKind::Registration,
        &["kayıt", "kayit", "ders seçimi", "registration", "enrol"],
    ),
    (
        HolidayKind::SemesterBreak,
        &["tatil", "break", "vacation", "recess"],
    ),
    (
        HolidayKind::NationalHoliday,
        &["bayram", "yılbaşı", "yilbasi", "holiday", "national", "new year"],
    ),
];

/// Classify a calendar line by keyword search.
pub fn classify(context: &str) -> HolidayKind {
    let lower = context.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map_or(HolidayKind::Other, |(kind, _)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_lines() {
        assert_eq!(classify("Güz Yarıyılı Final Sınavları"), HolidayKind::ExamPeriod);
        assert_eq!(classify("Ramazan Bayramı"), HolidayKind::ReligiousHoliday);
        assert_eq!(classify("Yarıyıl Tatili"), HolidayKind::SemesterBreak);
        assert_eq!(classify("Cumhuriyet Bayramı"), HolidayKind::NationalHoliday);
        assert_eq!(classify("Ders Kayıt Haftası"), HolidayKind::Registration);
    }

    #[test]
    fn test_english_lines() {
        assert_eq!(classify("Midterm Exams"), HolidayKind::ExamPeriod);
        assert_eq!(classify("Semester Break"), HolidayKind::SemesterBreak);
        assert_eq!(classify("Course Registration"), HolidayKind::Registration);
        assert_eq!(classify("Classes begin"), HolidayKind::Other);
        assert_eq!(classify("Bahar Yarıyılı Derslerinin Başlaması"), HolidayKind::Other);
    }
}
