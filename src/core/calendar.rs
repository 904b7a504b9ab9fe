//! Academic calendar for AY2025-26: teaching-week lookup and formatting.

use std::sync::OnceLock;

use chrono::{Datelike, Days, NaiveDate};

/// Kind of calendar period. Teaching and revision weeks carry their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Teaching(u8),
    Recess,
    Revision(u8),
}

/// One academic week, Monday through Sunday inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kind: PeriodKind,
}

impl WeekPeriod {
    pub fn name(&self) -> String {
        match self.kind {
            PeriodKind::Teaching(n) => format!("Teaching Week {}", n),
            PeriodKind::Recess => "Recess Week".to_string(),
            PeriodKind::Revision(n) => format!("Revision and Examination Week {}", n),
        }
    }

    /// Teaching week number, if this is a teaching week.
    pub fn teaching_week(&self) -> Option<u8> {
        match self.kind {
            PeriodKind::Teaching(n) => Some(n),
            _ => None,
        }
    }
}

/// Both semesters share the same 17-week shape: teaching 1-7, recess,
/// teaching 8-13, then three revision/examination weeks, all consecutive.
fn semester(first_monday: NaiveDate) -> Vec<WeekPeriod> {
    let kinds = (1..=7)
        .map(PeriodKind::Teaching)
        .chain(std::iter::once(PeriodKind::Recess))
        .chain((8..=13).map(PeriodKind::Teaching))
        .chain((1..=3).map(PeriodKind::Revision));
    kinds
        .enumerate()
        .map(|(i, kind)| {
            let start = first_monday + Days::new(7 * i as u64);
            WeekPeriod {
                start,
                end: start + Days::new(6),
                kind,
            }
        })
        .collect()
}

fn first_monday(year: i32, month: u32, day: u32) -> NaiveDate {
    // The AY2025-26 anchors are fixed known-good dates.
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar anchor")
}

/// All academic weeks of AY2025-26 in order.
pub fn academic_weeks() -> &'static [WeekPeriod] {
    static WEEKS: OnceLock<Vec<WeekPeriod>> = OnceLock::new();
    WEEKS.get_or_init(|| {
        let mut weeks = semester(first_monday(2025, 8, 11));
        weeks.extend(semester(first_monday(2026, 1, 12)));
        weeks
    })
}

/// The academic week containing `date`, if any (vacation gaps return None).
pub fn current_week(date: NaiveDate) -> Option<&'static WeekPeriod> {
    academic_weeks()
        .iter()
        .find(|w| date >= w.start && date <= w.end)
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

/// Human-readable range for the week containing `date`, e.g.
/// "11 - 17 August 2025", or "29 Sept - 5 Oct 2025" across a month boundary.
pub fn format_week_range(date: NaiveDate) -> Option<String> {
    let week = current_week(date)?;
    let (start, end) = (week.start, week.end);
    let range = if start.month() == end.month() {
        format!(
            "{} - {} {} {}",
            start.day(),
            end.day(),
            MONTHS[start.month0() as usize],
            start.year()
        )
    } else {
        format!(
            "{} {} - {} {} {}",
            start.day(),
            SHORT_MONTHS[start.month0() as usize],
            end.day(),
            SHORT_MONTHS[end.month0() as usize],
            start.year()
        )
    };
    Some(range)
}

/// Syllabus topics per teaching week, used to steer the tutor prompt.
pub fn weekly_topics(week_number: u8) -> &'static [&'static str] {
    match week_number {
        1 => &["Set Theory Fundamentals", "Venn Diagrams"],
        2 => &["Functions", "Relations", "Function Composition"],
        3 => &["Propositional Logic", "Truth Tables", "Logical Operators"],
        4 => &["Logical Equivalences", "Predicate Logic", "Quantifiers"],
        5 => &[
            "Direct Proofs",
            "Proof by Contradiction",
            "Mathematical Induction",
        ],
        6 => &[
            "Mathematical Induction",
            "Strong Induction",
            "Recursive Definitions",
        ],
        7 => &["Elementary Number Theory", "Divisibility", "GCD and LCM"],
        8 => &["Modular Arithmetic", "Congruences", "Applications"],
        9 => &["Counting Principles", "Permutations", "Combinations"],
        10 => &["Combinations", "Binomial Theorem", "Pascal's Triangle"],
        11 => &["Graph Theory", "Graph Types", "Graph Properties"],
        12 => &["Trees", "Spanning Trees", "Graph Traversal"],
        13 => &[
            "Course Review",
            "Problem Solving Strategies",
            "Exam Preparation",
        ],
        _ => &[],
    }
}

/// Progressive question tier derived from a 0-100 mastery score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionLevel {
    pub level: &'static str,
    pub description: &'static str,
    pub blooms: &'static str,
}

pub fn question_level(mastery: u8) -> QuestionLevel {
    match mastery {
        0..=29 => QuestionLevel {
            level: "Definition & Understanding",
            description: "Focus on basic concepts and definitions",
            blooms: "Remember & Understand",
        },
        30..=59 => QuestionLevel {
            level: "Application",
            description: "Apply concepts to solve problems",
            blooms: "Apply",
        },
        60..=79 => QuestionLevel {
            level: "Analysis & Evaluation",
            description: "Analyze relationships and evaluate solutions",
            blooms: "Analyze & Evaluate",
        },
        _ => QuestionLevel {
            level: "Synthesis & Creation",
            description: "Create new solutions and synthesize concepts",
            blooms: "Create",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn table_covers_both_semesters() {
        let weeks = academic_weeks();
        assert_eq!(weeks.len(), 34);
        assert_eq!(weeks[0].start, date(2025, 8, 11));
        assert_eq!(weeks[16].end, date(2025, 12, 7));
        assert_eq!(weeks[17].start, date(2026, 1, 12));
        assert_eq!(weeks[33].end, date(2026, 5, 10));
    }

    #[test]
    fn teaching_week_lookup() {
        let week = current_week(date(2025, 8, 20)).unwrap();
        assert_eq!(week.kind, PeriodKind::Teaching(2));
        assert_eq!(week.name(), "Teaching Week 2");
    }

    #[test]
    fn recess_week_lookup() {
        let week = current_week(date(2025, 10, 1)).unwrap();
        assert_eq!(week.kind, PeriodKind::Recess);
        assert_eq!(week.teaching_week(), None);
    }

    #[test]
    fn vacation_gap_has_no_week() {
        assert!(current_week(date(2025, 12, 25)).is_none());
        assert!(current_week(date(2026, 1, 11)).is_none());
    }

    #[test]
    fn boundary_days_inclusive() {
        assert_eq!(
            current_week(date(2025, 8, 11)).unwrap().kind,
            PeriodKind::Teaching(1)
        );
        assert_eq!(
            current_week(date(2025, 8, 17)).unwrap().kind,
            PeriodKind::Teaching(1)
        );
    }

    #[test]
    fn format_range_same_month() {
        assert_eq!(
            format_week_range(date(2025, 8, 13)).unwrap(),
            "11 - 17 August 2025"
        );
    }

    #[test]
    fn format_range_across_months() {
        // Recess week of semester 1 runs 29 Sept - 5 Oct.
        assert_eq!(
            format_week_range(date(2025, 10, 3)).unwrap(),
            "29 Sept - 5 Oct 2025"
        );
    }

    #[test]
    fn topics_known_and_unknown_weeks() {
        assert!(weekly_topics(3).contains(&"Truth Tables"));
        assert!(weekly_topics(0).is_empty());
        assert!(weekly_topics(14).is_empty());
    }

    #[test]
    fn question_level_thresholds() {
        assert_eq!(question_level(0).blooms, "Remember & Understand");
        assert_eq!(question_level(29).blooms, "Remember & Understand");
        assert_eq!(question_level(30).blooms, "Apply");
        assert_eq!(question_level(60).blooms, "Analyze & Evaluate");
        assert_eq!(question_level(80).blooms, "Create");
        assert_eq!(question_level(100).blooms, "Create");
    }
}
