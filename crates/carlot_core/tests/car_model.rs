use carlot_core::{validate_car_fields, Car, CarUpdate, CarValidationError, NewCar};

#[test]
fn car_serialization_uses_expected_wire_fields() {
    let car = Car {
        id: 7,
        make: "Tesla".to_string(),
        model: "Model 3".to_string(),
        year: 2023,
        color: "White".to_string(),
        price: 42_000.0,
    };

    let json = serde_json::to_value(&car).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["make"], "Tesla");
    assert_eq!(json["model"], "Model 3");
    assert_eq!(json["year"], 2023);
    assert_eq!(json["color"], "White");
    assert_eq!(json["price"], 42_000.0);

    let decoded: Car = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, car);
}

#[test]
fn new_car_color_defaults_to_empty() {
    let car: NewCar = serde_json::from_value(serde_json::json!({
        "make": "Ford",
        "model": "Focus",
        "year": 2019,
        "price": 12000.0
    }))
    .unwrap();
    assert_eq!(car.color, "");
    car.validate().unwrap();
}

#[test]
fn make_is_checked_before_model() {
    let err = validate_car_fields("", "", 2024, "", 1.0).unwrap_err();
    assert_eq!(err, CarValidationError::EmptyMake);
    assert_eq!(err.field(), "make");
}

#[test]
fn year_is_checked_before_price() {
    let err = validate_car_fields("Ford", "T", 1899, "", -1.0).unwrap_err();
    assert_eq!(err, CarValidationError::YearOutOfRange { year: 1899 });
    assert_eq!(err.to_string(), "year must be between 1900 and 2030, got 1899");
}

#[test]
fn price_must_be_non_negative_and_finite() {
    let err = validate_car_fields("Ford", "T", 2000, "", -1.0).unwrap_err();
    assert_eq!(err.field(), "price");

    let err = validate_car_fields("Ford", "T", 2000, "", f64::NAN).unwrap_err();
    assert_eq!(err, CarValidationError::NonFinitePrice);
}

#[test]
fn text_length_limits() {
    let long_make = "m".repeat(51);
    assert_eq!(
        validate_car_fields(&long_make, "T", 2000, "", 1.0).unwrap_err(),
        CarValidationError::MakeTooLong { len: 51 }
    );

    let long_model = "m".repeat(51);
    assert_eq!(
        validate_car_fields("Ford", &long_model, 2000, "", 1.0).unwrap_err(),
        CarValidationError::ModelTooLong { len: 51 }
    );

    validate_car_fields("Ford", "T", 2000, &"c".repeat(30), 1.0).unwrap();
}

#[test]
fn update_deserialization_ignores_unknown_keys() {
    let fields: CarUpdate = serde_json::from_value(serde_json::json!({
        "price": 500.0,
        "csrf_token": "abc",
        "id": 99
    }))
    .unwrap();

    assert_eq!(
        fields,
        CarUpdate {
            price: Some(500.0),
            ..CarUpdate::default()
        }
    );
}
