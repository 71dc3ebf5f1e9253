mod support;

use course_models::models::{ProblemSetModel, Quiz};
use course_models::{Model, ParseError, ProblemSet, SetType};
use serde_json::json;

fn default_quiz() -> serde_json::Value {
    json!({
        "set_dates": { "answer": 0, "due": 0, "open": 0 },
        "set_params": { "timed": false, "quiz_duration": 0 },
        "set_id": 0,
        "course_id": 0,
        "set_name": "",
        "set_visible": false,
        "set_type": "QUIZ"
    })
}

#[test]
fn test_default_quiz() {
    support::init_logger();
    let quiz = Quiz::default();
    assert_eq!(quiz.to_object(), default_quiz());
    assert_eq!(quiz.set_type(), SetType::Quiz);
}

#[test]
fn test_build_quiz() {
    let quiz = Quiz::new(&json!({ "set_name": "HW #1", "set_visible": 0 })).unwrap();
    assert!(!quiz.set_visible());
    assert_eq!(quiz.set_name(), "HW #1");

    let params = json!({
        "course_id": 4,
        "set_dates": { "answer": 1613951940, "due": 1612137540, "open": 1609545540 },
        "set_id": 7,
        "set_name": "HW #1",
        "set_params": { "timed": true, "quiz_duration": 30 },
        "set_type": "QUIZ",
        "set_visible": true
    });
    let quiz = Quiz::new(&params).unwrap();
    assert_eq!(quiz.to_object(), params);
    assert!(quiz.timed());
    assert_eq!(quiz.quiz_duration(), 30);
    assert!(quiz.is_valid());
}

#[test]
fn test_set_type_in_input_is_ignored() {
    let quiz = Quiz::new(&json!({ "set_type": "HW" })).unwrap();
    assert_eq!(quiz.to_object()["set_type"], json!("QUIZ"));
}

#[test]
fn test_quiz_field_names() {
    let mut expected = vec![
        "set_id",
        "set_name",
        "course_id",
        "set_type",
        "set_visible",
        "set_params",
        "set_dates",
    ];
    expected.sort();
    let mut names = Quiz::all_field_names();
    names.sort();
    assert_eq!(names, expected);

    let mut params = Quiz::param_fields();
    params.sort();
    assert_eq!(params, vec!["set_dates", "set_params"]);
}

#[test]
fn test_clone_is_independent() {
    let quiz = Quiz::default();
    let mut copy = quiz.clone();
    assert_eq!(copy.to_object(), default_quiz());

    copy.set_dates_mut()
        .unwrap()
        .set(&json!({ "due": 10 }))
        .unwrap();
    assert_eq!(quiz.set_dates().unwrap().get_int("due"), Some(0));
    assert_eq!(copy.set_dates().unwrap().get_int("due"), Some(10));
}

#[test]
fn test_param_defaults() {
    let quiz1 = Quiz::new(&json!({ "set_name": "HW #1" })).unwrap();
    let quiz2 = Quiz::new(&json!({ "set_name": "HW #1", "set_params": { "timed": false } })).unwrap();
    assert_eq!(quiz1, quiz2);
    let quiz3 = Quiz::new(&json!({ "set_name": "HW #1", "set_dates": { "open": 0 } })).unwrap();
    assert_eq!(quiz3.set_dates(), quiz1.set_dates());
}

#[test]
fn test_invalid_quiz_input() {
    for input in [
        json!({ "set_id": -1 }),
        json!({ "set_id": "-1" }),
        json!({ "course_id": -1 }),
        json!({ "course_id": "-1" }),
    ] {
        let err = Quiz::new(&input).unwrap_err();
        assert!(matches!(err.kind(), ParseError::NonNegInt(_)), "{}", input);
    }

    let err = Quiz::new(&json!({ "set_visible": "T" })).unwrap_err();
    assert!(matches!(err.kind(), ParseError::Boolean(_)));

    let err = Quiz::new(&json!({ "set_params": { "quiz_duration": -5 } })).unwrap_err();
    assert_eq!(err.field, "set_params.quiz_duration");
}

#[test]
fn test_failed_set_changes_nothing() {
    let mut quiz = Quiz::new(&json!({ "set_name": "Quiz #1" })).unwrap();
    let before = quiz.clone();
    assert!(quiz
        .set(&json!({ "set_name": "Quiz #2", "set_visible": "maybe" }))
        .is_err());
    assert_eq!(quiz, before);

    quiz.set(&json!({ "set_visible": true })).unwrap();
    assert!(quiz.set_visible());
    quiz.set(&json!({ "set_visible": false, "set_name": "HW #9" }))
        .unwrap();
    assert!(!quiz.set_visible());
    assert_eq!(quiz.set_name(), "HW #9");

    // null resets to the default
    quiz.set(&json!({ "set_name": null })).unwrap();
    assert_eq!(quiz.set_name(), "");
}

#[test]
fn test_quiz_dates() {
    let mut quiz = Quiz::default();
    quiz.set_params_mut()
        .unwrap()
        .set(&json!({ "timed": true }))
        .unwrap();
    assert!(quiz.timed());

    let dates = |quiz: &mut Quiz, value| {
        quiz.set_dates_mut().unwrap().set(&value).unwrap();
    };

    dates(&mut quiz, json!({ "open": 0, "due": 10, "answer": 20 }));
    assert!(quiz.has_valid_dates());

    dates(&mut quiz, json!({ "open": 0, "due": 30, "answer": 20 }));
    assert!(!quiz.has_valid_dates());

    dates(&mut quiz, json!({ "open": 100, "due": 20, "answer": 150 }));
    assert!(!quiz.has_valid_dates());
    assert!(!quiz.is_valid());

    dates(&mut quiz, json!({ "open": 0, "due": 10, "answer": 15 }));
    assert!(quiz.has_valid_dates());
}

#[test]
fn test_round_trip_through_problem_set() {
    let quiz = Quiz::new(&json!({
        "set_name": "Quiz #3",
        "set_dates": { "open": 5, "due": 6, "answer": 7 }
    }))
    .unwrap();
    let set = ProblemSet::parse(&quiz.to_object()).unwrap();
    assert_eq!(set, ProblemSet::from(quiz));
}
