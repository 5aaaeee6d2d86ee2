use formation_terminal::fields::Field;
use formation_terminal::validation::{FieldInput, FormValues, validate};

fn scenario_values() -> FormValues {
    FormValues::from_numbers(&[
        (Field::ExpectedGoals, 1.5),
        (Field::ExpectedGoalsAgainst, 1.0),
        (Field::Possession, 55.0),
        (Field::ExpectedAssists, 0.8),
        (Field::KeyPasses, 10.0),
        (Field::PassesPenaltyArea, 20.0),
        (Field::ProgressivePasses, 30.0),
    ])
}

#[test]
fn every_in_range_value_is_clean() {
    for field in Field::ALL {
        let bounds = field.bounds();
        let steps = 8;
        for i in 0..=steps {
            let value = bounds.minimum + (bounds.maximum - bounds.minimum) * i as f64 / steps as f64;
            let values = FormValues::from_numbers(&[(field, value)]);
            assert!(
                validate(&values).is_empty(),
                "{field} = {value} should be valid"
            );
        }
    }
}

#[test]
fn below_minimum_gives_single_less_than_message() {
    for field in Field::ALL {
        let values = FormValues::from_numbers(&[(field, field.bounds().minimum - 1.0)]);
        let errors = validate(&values);
        assert_eq!(errors, vec![format!("{} cannot be less than 0", field.key())]);
    }
}

#[test]
fn non_numeric_input_always_reports_invalid_value() {
    for field in Field::ALL {
        for raw in ["", "abc", "1,5", "--2"] {
            let mut values = FormValues::new();
            values.push(field, FieldInput::Invalid(raw.to_string()));
            let errors = validate(&values);
            assert_eq!(errors, vec![format!("Invalid value for {}", field.key())]);
        }
    }
}

#[test]
fn scenario_a_values_validate_clean() {
    assert!(validate(&scenario_values()).is_empty());
}

#[test]
fn scenario_b_possession_over_hundred() {
    let mut values = FormValues::new();
    for (field, input) in scenario_values().iter() {
        if *field == Field::Possession {
            values.push(*field, FieldInput::Number(150.0));
        } else {
            values.push(*field, input.clone());
        }
    }
    assert_eq!(validate(&values), vec!["Poss cannot be more than 100"]);
}

#[test]
fn validation_is_idempotent() {
    let mut values = scenario_values();
    values.push(Field::KeyPasses, FieldInput::Number(-3.0));
    values.push(Field::ExpectedGoals, FieldInput::Invalid("x".to_string()));
    let first = validate(&values);
    let second = validate(&values);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}
