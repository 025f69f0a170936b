use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// The fixed grade-point breakpoint table: lower bounds in descending
/// order, covering the whole 0-100 range. A grade earns the points of the
/// first bracket whose bound it reaches, so fractional grades between two
/// bounds fall into the lower bracket. A grade below the passing line
/// earns 0.0 points but still carries full credit weight in GPA terms.
const GRADE_SCALE: [(Decimal, Decimal); 10] = [
    (dec!(90), dec!(4.0)),
    (dec!(85), dec!(3.7)),
    (dec!(80), dec!(3.3)),
    (dec!(75), dec!(3.0)),
    (dec!(70), dec!(2.7)),
    (dec!(67), dec!(2.3)),
    (dec!(64), dec!(2.0)),
    (dec!(62), dec!(1.7)),
    (dec!(60), dec!(1.0)),
    (dec!(0), dec!(0.0)),
];

/// Maps a numeric final grade on the 0-100 scale to grade points on the
/// 0.0-4.0 scale.
///
/// Pure and total: a grade reaching no bracket bound (possible only below
/// zero) yields 0.0 rather than an error.
pub fn grade_points(final_grade: Decimal) -> Decimal {
    for (low, points) in GRADE_SCALE {
        if final_grade >= low {
            return points;
        }
    }
    Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_breakpoints() {
        assert_eq!(grade_points(dec!(100)), dec!(4.0));
        assert_eq!(grade_points(dec!(90)), dec!(4.0));
        assert_eq!(grade_points(dec!(75)), dec!(3.0));
        assert_eq!(grade_points(dec!(60)), dec!(1.0));
        assert_eq!(grade_points(dec!(55)), dec!(0.0));
        assert_eq!(grade_points(dec!(0)), dec!(0.0));
    }

    #[test]
    fn fractional_grades_fall_into_the_lower_bracket() {
        assert_eq!(grade_points(dec!(89.5)), dec!(3.7));
        assert_eq!(grade_points(dec!(63.5)), dec!(1.7));
        assert_eq!(grade_points(dec!(59.99)), dec!(0.0));
        assert_eq!(grade_points(dec!(60.01)), dec!(1.0));
    }

    #[test]
    fn monotonic_over_quarter_point_grades() {
        let mut previous = grade_points(dec!(0));
        let mut grade = dec!(0);
        while grade <= dec!(100) {
            let points = grade_points(grade);
            assert!(
                points >= previous,
                "points({grade}) = {points} dipped below {previous}"
            );
            previous = points;
            grade += dec!(0.25);
        }
    }

    #[test]
    fn stays_within_the_four_point_scale() {
        for grade in 0..=100u32 {
            let points = grade_points(Decimal::from(grade));
            assert!(points >= Decimal::ZERO && points <= dec!(4.0));
        }
    }
}
